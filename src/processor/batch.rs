//! Failure-isolating batch processor

use super::result::{Item, ProcessResult, ProcessorStats};
use crate::clock::{Clock, SystemClock};
use crate::config::ConfigHandle;
use crate::error::{DataprocError, ErrorCode};
use chrono::{DateTime, Utc};
use futures::future::{join_all, FutureExt};
use std::any::Any;
use std::fmt::Display;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

/// Applies a transform to every item of a batch
///
/// One item failing never affects another: every input item gets exactly one
/// [`ProcessResult`], at the same position. Successes are counted across all
/// batches for the lifetime of the processor.
pub struct BatchProcessor {
    config: ConfigHandle,
    clock: Arc<dyn Clock>,
    created_at: DateTime<Utc>,
    processed_count: AtomicU64,
}

impl BatchProcessor {
    pub fn new(config: ConfigHandle) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: ConfigHandle, clock: Arc<dyn Clock>) -> Self {
        let created_at = clock.now();
        Self {
            config,
            clock,
            created_at,
            processed_count: AtomicU64::new(0),
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Current time on this processor's clock
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn processed_count(&self) -> u64 {
        self.processed_count.load(Ordering::SeqCst)
    }

    /// Process items one at a time, in order
    ///
    /// A transform error or panic becomes that item's error result.
    pub fn process_batch<F, E>(&self, items: &[Item], mut transform: F) -> Vec<ProcessResult>
    where
        F: FnMut(&Item) -> Result<Item, E>,
        E: Display,
    {
        debug!("Processing batch of {} items", items.len());

        let results: Vec<ProcessResult> = items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let outcome = match panic::catch_unwind(AssertUnwindSafe(|| transform(item))) {
                    Ok(Ok(data)) => Ok(data),
                    Ok(Err(e)) => Err(DataprocError::item(
                        ErrorCode::ITEM_TRANSFORM_FAILED,
                        index,
                        e.to_string(),
                    )),
                    Err(payload) => Err(panicked(index, payload)),
                };
                self.settle(outcome)
            })
            .collect();

        self.log_batch(&results);
        results
    }

    /// Process items concurrently, at most `max_parallel` at a time
    ///
    /// Results come back in input order no matter which item finishes first.
    /// Each item is bounded by the config's `timeout`.
    pub async fn process_batch_concurrent<F, Fut, E>(
        &self,
        items: &[Item],
        max_parallel: usize,
        transform: F,
    ) -> Vec<ProcessResult>
    where
        F: Fn(Item) -> Fut,
        Fut: Future<Output = Result<Item, E>>,
        E: Display,
    {
        let max_parallel = max_parallel.max(1);
        let timeout = self.config.with(|config| config.timeout());
        debug!(
            "Processing batch of {} items with parallelism {} and timeout {:?}",
            items.len(),
            max_parallel,
            timeout
        );

        let semaphore = Semaphore::new(max_parallel);
        let semaphore = &semaphore;
        let transform = &transform;

        let futures = items.iter().enumerate().map(|(index, item)| async move {
            let _permit = semaphore.acquire().await;
            let guarded = AssertUnwindSafe(transform(item.clone())).catch_unwind();
            let outcome = match tokio::time::timeout(timeout, guarded).await {
                Ok(Ok(Ok(data))) => Ok(data),
                Ok(Ok(Err(e))) => Err(DataprocError::item(
                    ErrorCode::ITEM_TRANSFORM_FAILED,
                    index,
                    e.to_string(),
                )),
                Ok(Err(payload)) => Err(panicked(index, payload)),
                Err(_) => Err(DataprocError::item(
                    ErrorCode::ITEM_TIMEOUT,
                    index,
                    format!("transform timed out after {:?}", timeout),
                )),
            };
            self.settle(outcome)
        });

        let results = join_all(futures).await;
        self.log_batch(&results);
        results
    }

    /// Snapshot of counters and the current config
    pub fn get_stats(&self) -> ProcessorStats {
        let elapsed = self.clock.now() - self.created_at;
        ProcessorStats {
            processed_count: self.processed_count(),
            created_at: self.created_at,
            elapsed_seconds: elapsed.to_std().map(|d| d.as_secs_f64()).unwrap_or(0.0),
            config: self.config.snapshot(),
        }
    }

    fn settle(&self, outcome: Result<Item, DataprocError>) -> ProcessResult {
        let timestamp = self.clock.now();
        match outcome {
            Ok(data) => {
                self.processed_count.fetch_add(1, Ordering::SeqCst);
                ProcessResult::Success { data, timestamp }
            }
            Err(e) => {
                warn!("{}", e);
                ProcessResult::Error {
                    error: e.message().to_string(),
                    timestamp,
                }
            }
        }
    }

    fn log_batch(&self, results: &[ProcessResult]) {
        let failed = results.iter().filter(|r| !r.is_success()).count();
        debug!(
            "Batch finished: {} succeeded, {} failed, {} processed in total",
            results.len() - failed,
            failed,
            self.processed_count()
        );
    }
}

fn panicked(index: usize, payload: Box<dyn Any + Send>) -> DataprocError {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_string());
    DataprocError::item(
        ErrorCode::ITEM_PANICKED,
        index,
        format!("transform panicked: {}", detail),
    )
}
