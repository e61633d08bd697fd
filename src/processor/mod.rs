//! Batch item processing
//!
//! A [`BatchProcessor`] is bound to a read-only [`ConfigHandle`] and applies a
//! fallible transform to each item of a batch. A failing item yields an
//! error result in its own slot; it never aborts the batch and never reaches
//! the caller as an `Err`.
//!
//! # Examples
//!
//! ```rust
//! use dataproc::config::ConfigStore;
//! use dataproc::processor::{BatchProcessor, Item};
//! use serde_json::json;
//!
//! let store = ConfigStore::default();
//! let processor = BatchProcessor::new(store.handle());
//!
//! let items: Vec<Item> = vec![
//!     json!({"id": 1}).as_object().cloned().unwrap(),
//!     json!({"id": "two"}).as_object().cloned().unwrap(),
//! ];
//!
//! let results = processor.process_batch(&items, |item| match item["id"].as_i64() {
//!     Some(_) => Ok(item.clone()),
//!     None => Err("id is not a number"),
//! });
//!
//! assert!(results[0].is_success());
//! assert_eq!(results[1].error(), Some("id is not a number"));
//! assert_eq!(processor.get_stats().processed_count, 1);
//! ```
//!
//! [`ConfigHandle`]: crate::config::ConfigHandle

pub mod batch;
pub mod result;
#[cfg(test)]
mod tests;
pub mod transforms;

pub use batch::BatchProcessor;
pub use result::{summarize, BatchSummary, Item, ProcessResult, ProcessorStats};
