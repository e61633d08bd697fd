//! CLI argument structures

use crate::app::config::DEFAULT_CONFIG_PATH;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Process batches of records against a persisted configuration
#[derive(Parser)]
#[command(name = "dataproc")]
#[command(about = "dataproc - Batch record processing with file-backed settings", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace, -vvv for all)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Settings file (JSON, or TOML/YAML by extension)
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Process records and print a JSON report (default command)
    Report {
        /// JSON file holding an array of objects; uses built-in sample records if omitted
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Process up to N records concurrently
        #[arg(short = 'p', long, value_name = "N")]
        parallel: Option<usize>,
    },
    /// Inspect or change settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective settings as JSON
    Show,
    /// Print a single setting
    Get {
        /// Setting name
        key: String,
    },
    /// Change a setting and save the file
    Set {
        /// Setting name
        key: String,
        /// New value; parsed as JSON, otherwise stored as a string
        value: String,
    },
}
