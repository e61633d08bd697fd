//! Error handling utilities
//!
//! This module provides centralized error handling for the application.

use crate::error::DataprocError;
use tracing::error;

/// Report a fatal error and exit
///
/// - `verbose = 0`: user-friendly message only
/// - `verbose >= 1`: also prints the full cause chain
pub fn handle_fatal_error(error: anyhow::Error, verbose: u8) -> ! {
    error!("Fatal error: {}", error);

    match error.downcast_ref::<DataprocError>() {
        Some(err) => eprintln!("{}", err.user_message()),
        None => eprintln!("Error: {error}"),
    }

    if verbose >= 1 {
        eprintln!("\nError chain:");
        for (i, cause) in error.chain().enumerate() {
            eprintln!("  {}: {}", i, cause);
        }
    }

    std::process::exit(1)
}
