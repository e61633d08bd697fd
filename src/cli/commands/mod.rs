pub mod config;
pub mod report;

pub use config::run_config_command;
pub use report::run_report;
