//! Command routing and execution

use crate::app::AppConfig;
use crate::cli::args::Commands;
use crate::cli::commands::{run_config_command, run_report};
use anyhow::Result;

/// Execute a CLI command based on the parsed arguments
pub async fn execute_command(command: Option<Commands>, app: &AppConfig) -> Result<()> {
    match command {
        Some(Commands::Report { input, parallel }) => {
            run_report(&app.config_path, input.as_deref(), parallel).await
        }
        Some(Commands::Config { command }) => run_config_command(command, &app.config_path),
        None => run_report(&app.config_path, None, None).await,
    }
}
