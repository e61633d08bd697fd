//! `dataproc report`: run a batch and print the outcome as JSON

use crate::config::{Config, ConfigStore};
use crate::processor::transforms::mark_processed;
use crate::processor::{
    summarize, BatchProcessor, BatchSummary, Item, ProcessResult, ProcessorStats,
};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use std::fs;
use std::path::Path;
use tracing::info;

#[derive(Debug, Serialize)]
pub struct Report {
    pub report_generated_at: DateTime<Utc>,
    /// Why the settings file was not used, when defaults were
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_warning: Option<String>,
    pub effective_settings: EffectiveSettings,
    pub processing_stats: ProcessorStats,
    pub summary: BatchSummary,
    pub processed_results: Vec<ProcessResult>,
}

/// Typed settings the run used, after defaults for missing or unusable keys
#[derive(Debug, Serialize, PartialEq)]
pub struct EffectiveSettings {
    pub timeout_secs: f64,
    pub retries: u32,
    pub batch_size: usize,
}

impl From<&Config> for EffectiveSettings {
    fn from(config: &Config) -> Self {
        Self {
            timeout_secs: config.timeout().as_secs_f64(),
            retries: config.retries(),
            batch_size: config.batch_size(),
        }
    }
}

pub async fn run_report(
    config_path: &Path,
    input: Option<&Path>,
    parallel: Option<usize>,
) -> Result<()> {
    let (store, outcome) = ConfigStore::open(config_path);
    let items = match input {
        Some(path) => read_items(path)?,
        None => sample_items(),
    };

    let processor = BatchProcessor::new(store.handle());
    let mut report = build_report(&store, &processor, &items, parallel).await;
    report.config_warning = outcome.warning().map(|e| e.user_message());

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Process `items` in chunks of the configured `batch_size`
pub async fn build_report(
    store: &ConfigStore,
    processor: &BatchProcessor,
    items: &[Item],
    parallel: Option<usize>,
) -> Report {
    let settings = EffectiveSettings::from(&store.snapshot());
    let batch_size = settings.batch_size;
    let transform = mark_processed(processor.created_at());
    let transform = &transform;

    let mut results = Vec::with_capacity(items.len());
    for chunk in items.chunks(batch_size) {
        let chunk_results = match parallel {
            Some(max_parallel) => {
                processor
                    .process_batch_concurrent(chunk, max_parallel, |item| async move {
                        transform(&item)
                    })
                    .await
            }
            None => processor.process_batch(chunk, transform),
        };
        results.extend(chunk_results);
    }

    let summary = summarize(&results);
    info!(
        "Processed {} records: {} succeeded, {} failed",
        summary.total, summary.successful, summary.failed
    );

    Report {
        report_generated_at: processor.now(),
        config_warning: None,
        effective_settings: settings,
        processing_stats: processor.get_stats(),
        summary,
        processed_results: results,
    }
}

fn read_items(path: &Path) -> Result<Vec<Item>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read items from {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("{} must hold a JSON array of objects", path.display()))
}

fn sample_items() -> Vec<Item> {
    [
        json!({"id": 1, "name": "Alice", "value": 100}),
        json!({"id": 2, "name": "Bob", "value": 200}),
        json!({"id": 3, "name": "Charlie", "value": 300}),
    ]
    .into_iter()
    .filter_map(|value| match value {
        serde_json::Value::Object(map) => Some(map),
        _ => None,
    })
    .collect()
}
