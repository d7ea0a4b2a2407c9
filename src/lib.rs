pub mod application;
pub mod graphics;
pub mod logging;
pub mod scene;
pub mod timing;
