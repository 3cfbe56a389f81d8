use astro_rs::cli::{Cli, execute_command, load_settings};
use astro_rs::logger::init_logger;
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = load_settings(&cli)?;
    let log_level = init_logger(&settings.logger)?;

    if let Err(e) = execute_command(&cli, settings, Some(log_level)).await {
        tracing::error!(error = ?e, "Command failed");
        return Err(e);
    }
    Ok(())
}
