use {
    anyhow::{Context, Result},
    spindrift::{application::Application, logging},
};

fn main() -> Result<()> {
    logging::setup()?;
    let app = Application::new("Spindrift")
        .context("Unable to initialize the application")?;
    app.run()
}
