//! Application configuration
//!
//! Settings for the binary itself, as opposed to the key-value settings the
//! [`ConfigStore`](crate::config::ConfigStore) manages.

use std::path::PathBuf;

/// Default location of the settings file
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Application configuration structure
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Verbosity level for logging
    pub verbose: u8,
    /// Settings file the store loads from and saves to
    pub config_path: PathBuf,
}

impl AppConfig {
    pub fn new(verbose: u8) -> Self {
        Self {
            verbose,
            ..Self::default()
        }
    }

    pub fn with_config_path(mut self, path: PathBuf) -> Self {
        self.config_path = path;
        self
    }

    /// Get the log level string based on verbosity
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            verbose: 0,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }
}
