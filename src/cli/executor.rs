//! Dispatches a parsed command line to its handler.

use super::handlers::{MigrateCommandHandler, ServeCommandHandler};
use super::parser::{Cli, Commands};
use crate::config::Settings;
use crate::logger::LogLevelHandle;

/// Runs the selected command; no subcommand means `serve`.
pub async fn execute_command(
    cli: &Cli,
    settings: Settings,
    log_level: Option<LogLevelHandle>,
) -> anyhow::Result<()> {
    match &cli.command {
        Some(Commands::Serve { dry_run, .. }) => {
            ServeCommandHandler::new(settings)
                .execute(*dry_run, log_level)
                .await
        }
        None => ServeCommandHandler::new(settings).execute(false, log_level).await,
        Some(Commands::Migrate { dry_run, rollback }) => {
            MigrateCommandHandler::new(settings)
                .execute(*dry_run, *rollback)
                .await?;
            Ok(())
        }
    }
}
