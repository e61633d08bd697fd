//! Per-item outcomes and aggregate statistics

use crate::config::Config;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An opaque record handed to a transform
pub type Item = Map<String, Value>;

/// Outcome for a single item of a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ProcessResult {
    Success {
        data: Item,
        timestamp: DateTime<Utc>,
    },
    Error {
        error: String,
        timestamp: DateTime<Utc>,
    },
}

impl ProcessResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Transformed item, for successes
    pub fn data(&self) -> Option<&Item> {
        match self {
            Self::Success { data, .. } => Some(data),
            Self::Error { .. } => None,
        }
    }

    /// Failure message, for errors
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Error { error, .. } => Some(error),
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::Success { timestamp, .. } | Self::Error { timestamp, .. } => *timestamp,
        }
    }
}

/// Point-in-time view of a processor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessorStats {
    /// Successful items across every batch so far
    pub processed_count: u64,
    pub created_at: DateTime<Utc>,
    pub elapsed_seconds: f64,
    pub config: Config,
}

/// Success/failure tally over a result slice
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    /// Percentage (0.0-100.0), 0.0 for an empty batch
    pub success_rate: f64,
}

/// Tally the outcomes of a batch
pub fn summarize(results: &[ProcessResult]) -> BatchSummary {
    let total = results.len();
    let successful = results.iter().filter(|r| r.is_success()).count();
    let success_rate = if total == 0 {
        0.0
    } else {
        (successful as f64 / total as f64) * 100.0
    };

    BatchSummary {
        total,
        successful,
        failed: total - successful,
        success_rate,
    }
}
