mod error;

pub mod vulkan_api;

pub use self::error::GraphicsError;
