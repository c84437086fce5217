#![windows_subsystem = "windows"]

use anyhow::Result;
use tracing_subscriber::EnvFilter;
use txwatch::{config::Config, gui};

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;
    gui::launch(config)?;

    Ok(())
}
