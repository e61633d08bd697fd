//! # dataproc
//!
//! A key-value configuration store that never leaves the caller without
//! settings, and a batch processor that never lets one bad record sink a
//! batch.
//!
//! ## Modules
//!
//! - `config` - File-backed settings with default fallback
//! - `processor` - Failure-isolating batch processing and statistics
//! - `clock` - Injectable time source
//! - `error` - Unified error type with numeric codes
//! - `app` - Logging and application settings for the binary
//! - `cli` - Command-line surface
pub mod app;
pub mod cli;
pub mod clock;
pub mod config;
pub mod error;
pub mod processor;

pub use config::{Config, ConfigHandle, ConfigStore, ConfigValue, LoadOutcome};
pub use error::{DataprocError, ErrorCode};
pub use processor::{BatchProcessor, Item, ProcessResult, ProcessorStats};
