//! Key-value configuration with file persistence
//!
//! A [`ConfigStore`] owns a single [`Config`] and optionally a backing file.
//! Loading never fails: a missing, unreadable or malformed file leaves the
//! store on its built-in defaults (`timeout: 30`, `retries: 3`,
//! `batch_size: 100`) and the cause is reported through [`LoadOutcome`].
//!
//! Files are JSON unless their extension says `.toml`, `.yaml` or `.yml`.
//!
//! # Examples
//!
//! ```rust
//! use dataproc::config::{ConfigStore, ConfigValue};
//!
//! let mut store = ConfigStore::default();
//! store.update([("retries", 5)]);
//!
//! assert_eq!(store.get("retries", 0), ConfigValue::Integer(5));
//! assert_eq!(store.get("missing", "x"), ConfigValue::from("x"));
//! ```

pub mod format;
pub mod store;
pub mod value;

pub use format::{ConfigFormat, FormatError};
pub use store::{ConfigHandle, ConfigStore, LoadOutcome};
pub use value::{
    Config, ConfigValue, BATCH_SIZE_KEY, DEFAULT_BATCH_SIZE, DEFAULT_RETRIES,
    DEFAULT_TIMEOUT_SECS, RETRIES_KEY, TIMEOUT_KEY,
};
