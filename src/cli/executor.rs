//! Command executor for dispatching CLI commands

use super::handlers::{MigrateCommandHandler, ServeCommandHandler};
use super::parser::{Cli, Commands};
use crate::config::Settings;
use crate::error::AppResult;

/// What main should do once a command has run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Start the HTTP server with the merged settings
    StartServer,
    /// The command finished; exit
    Completed,
}

/// Execute a CLI command with merged and validated settings
pub async fn execute_command(cli: &Cli, settings: Settings) -> AppResult<CommandOutcome> {
    match cli.selected_command() {
        Commands::Serve { dry_run: true, .. } => {
            ServeCommandHandler::new(settings).dry_run()?;
            Ok(CommandOutcome::Completed)
        }
        Commands::Serve { .. } => Ok(CommandOutcome::StartServer),
        Commands::Migrate { dry_run, rollback } => {
            if let Some(steps) = rollback
                && steps > 50
            {
                tracing::warn!(steps, "Rolling back a large number of migrations");
            }
            MigrateCommandHandler::new(settings)
                .execute(dry_run, rollback)
                .await?;
            Ok(CommandOutcome::Completed)
        }
    }
}
