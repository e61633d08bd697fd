//! CLI command handlers
//!
//! Thin glue over the library: load settings, run a batch, format output.

pub mod args;
pub mod commands;
pub mod router;

pub use args::{Cli, Commands, ConfigCommands};
pub use router::execute_command;
