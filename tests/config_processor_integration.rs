//! End-to-end library flow: load settings, process a batch, read stats

use dataproc::config::ConfigValue;
use dataproc::processor::transforms::require_fields;
use dataproc::{BatchProcessor, ConfigStore, ErrorCode, Item};
use serde_json::json;
use std::fs;
use tempfile::TempDir;

fn items() -> Vec<Item> {
    [
        json!({"id": 1, "value": 10}),
        json!({"id": 2}),
        json!({"id": 3, "value": 30}),
    ]
    .into_iter()
    .map(|v| v.as_object().cloned().unwrap())
    .collect()
}

#[test]
fn test_load_process_and_report() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("config.json");
    fs::write(&path, r#"{"timeout": 12, "retries": 1, "batch_size": 50, "region": "eu"}"#)?;

    let (store, outcome) = ConfigStore::open(&path);
    assert!(outcome.is_loaded());

    let processor = BatchProcessor::new(store.handle());
    let first = processor.process_batch(&items(), require_fields(&["id", "value"]));
    let second = processor.process_batch(&items(), require_fields(&["id"]));

    assert_eq!(first.len(), 3);
    assert!(first[0].is_success() && !first[1].is_success() && first[2].is_success());
    assert_eq!(first[1].error(), Some("missing required field 'value'"));
    assert!(second.iter().all(|r| r.is_success()));

    let stats = processor.get_stats();
    assert_eq!(stats.processed_count, 5);
    assert_eq!(stats.config.get("region"), Some(&ConfigValue::from("eu")));
    assert!(stats.elapsed_seconds >= 0.0);
    Ok(())
}

#[test]
fn test_missing_config_still_processes_with_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let (store, outcome) = ConfigStore::open(temp_dir.path().join("absent.yaml"));

    assert_eq!(
        outcome.warning().map(|e| e.code()),
        Some(ErrorCode::CONFIG_NOT_FOUND)
    );

    let processor = BatchProcessor::new(store.handle());
    let results = processor.process_batch(&items(), require_fields(&["id"]));
    assert_eq!(results.len(), 3);
    assert_eq!(processor.get_stats().config.batch_size(), 100);
}
