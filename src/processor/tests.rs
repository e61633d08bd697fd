use super::transforms::mark_processed;
use super::*;
use crate::clock::ManualClock;
use crate::config::{Config, ConfigHandle, ConfigStore, ConfigValue};
use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use serde_json::{json, Value};
use std::sync::Arc;

fn item(value: Value) -> Item {
    value.as_object().cloned().unwrap()
}

fn sample_items() -> Vec<Item> {
    vec![
        item(json!({"id": 1, "name": "Alice", "value": 100})),
        item(json!({"id": 2, "name": "Bob", "value": 200})),
        item(json!({"id": 3, "name": "Charlie", "value": 300})),
    ]
}

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()
}

fn fixed_processor(config: ConfigHandle) -> (BatchProcessor, ManualClock) {
    let clock = ManualClock::new(start());
    let processor = BatchProcessor::with_clock(config, Arc::new(clock.clone()));
    (processor, clock)
}

/// Fails on Bob, doubles everyone else's value
fn double_unless_bob(item: &Item) -> Result<Item, String> {
    if item["name"] == "Bob" {
        return Err("Bob is not allowed".to_string());
    }
    let mut out = item.clone();
    let value = item["value"].as_i64().ok_or("value is not a number")?;
    out.insert("value".to_string(), json!(value * 2));
    Ok(out)
}

#[test]
fn test_new_processor_starts_empty() {
    let store = ConfigStore::default();
    let (processor, _clock) = fixed_processor(store.handle());

    let stats = processor.get_stats();
    assert_eq!(stats.processed_count, 0);
    assert_eq!(stats.created_at, start());
    assert_eq!(stats.elapsed_seconds, 0.0);
    assert_eq!(stats.config, Config::defaults());
}

#[test]
fn test_failure_is_isolated_to_its_item() {
    let store = ConfigStore::default();
    let (processor, _clock) = fixed_processor(store.handle());

    let results = processor.process_batch(&sample_items(), double_unless_bob);

    assert_eq!(results.len(), 3);
    assert!(results[0].is_success());
    assert_eq!(results[0].data().unwrap()["value"], json!(200));
    assert_eq!(results[1].error(), Some("Bob is not allowed"));
    assert!(results[2].is_success());
    assert_eq!(results[2].data().unwrap()["name"], json!("Charlie"));
    assert_eq!(processor.processed_count(), 2);
}

#[test]
fn test_panicking_transform_becomes_error_result() {
    let store = ConfigStore::default();
    let (processor, _clock) = fixed_processor(store.handle());

    let results = processor.process_batch(&sample_items(), |item| {
        if item["id"] == 2 {
            panic!("unexpected record");
        }
        Ok::<_, String>(item.clone())
    });

    assert_eq!(results.len(), 3);
    assert_eq!(
        results[1].error(),
        Some("transform panicked: unexpected record")
    );
    assert!(results[0].is_success() && results[2].is_success());
    assert_eq!(processor.processed_count(), 2);
}

#[test]
fn test_timestamps_come_from_clock() {
    let store = ConfigStore::default();
    let (processor, clock) = fixed_processor(store.handle());
    clock.advance(Duration::seconds(5));

    let results = processor.process_batch(&sample_items(), double_unless_bob);

    for result in &results {
        assert_eq!(result.timestamp(), start() + Duration::seconds(5));
    }

    clock.advance(Duration::milliseconds(2500));
    assert_eq!(processor.get_stats().elapsed_seconds, 7.5);
}

#[test]
fn test_stats_accumulate_across_batches() {
    let store = ConfigStore::default();
    let (processor, _clock) = fixed_processor(store.handle());

    let first = processor.process_batch(&sample_items(), double_unless_bob);
    let second = processor.process_batch(&sample_items()[..1], double_unless_bob);

    let successes = summarize(&first).successful + summarize(&second).successful;
    assert_eq!(successes, 3);
    assert_eq!(processor.get_stats().processed_count, 3);
}

#[test]
fn test_empty_batch() {
    let store = ConfigStore::default();
    let (processor, _clock) = fixed_processor(store.handle());

    let results = processor.process_batch(&[], double_unless_bob);

    assert!(results.is_empty());
    assert_eq!(processor.processed_count(), 0);
    let summary = summarize(&results);
    assert_eq!(summary.total, 0);
    assert_eq!(summary.success_rate, 0.0);
}

#[test]
fn test_stats_snapshot_tracks_store_config() {
    let mut store = ConfigStore::default();
    let (processor, _clock) = fixed_processor(store.handle());

    let before = processor.get_stats();
    store.update([("retries", 5)]);
    let after = processor.get_stats();

    assert_eq!(before.config.get("retries"), Some(&ConfigValue::Integer(3)));
    assert_eq!(after.config.get("retries"), Some(&ConfigValue::Integer(5)));
}

#[test]
fn test_mark_processed_uses_creation_time() {
    let store = ConfigStore::default();
    let (processor, _clock) = fixed_processor(store.handle());

    let results =
        processor.process_batch(&sample_items(), mark_processed(processor.created_at()));

    assert!(results.iter().all(ProcessResult::is_success));
    let data = results[0].data().unwrap();
    assert_eq!(data["processed"], json!(true));
    assert_eq!(data["processed_at"], json!("2024-05-01T09:00:00.000000Z"));
}

#[test]
fn test_result_serialization_shape() {
    let timestamp = start();
    let success = ProcessResult::Success {
        data: item(json!({"id": 1})),
        timestamp,
    };
    let error = ProcessResult::Error {
        error: "bad".to_string(),
        timestamp,
    };

    assert_eq!(
        serde_json::to_value(&success).unwrap(),
        json!({"status": "success", "data": {"id": 1}, "timestamp": "2024-05-01T09:00:00Z"})
    );
    assert_eq!(
        serde_json::to_value(&error).unwrap(),
        json!({"status": "error", "error": "bad", "timestamp": "2024-05-01T09:00:00Z"})
    );
}

#[test]
fn test_summarize() {
    let store = ConfigStore::default();
    let (processor, _clock) = fixed_processor(store.handle());
    let results = processor.process_batch(&sample_items(), double_unless_bob);

    let summary = summarize(&results);
    assert_eq!(summary.total, 3);
    assert_eq!(summary.successful, 2);
    assert_eq!(summary.failed, 1);
    assert!((summary.success_rate - 66.666).abs() < 0.01);
}

#[tokio::test]
async fn test_concurrent_batch_preserves_order() {
    let store = ConfigStore::default();
    let processor = BatchProcessor::new(store.handle());
    let items: Vec<Item> = (0..8).map(|i| item(json!({"id": i}))).collect();

    // Earlier items sleep longer, so they finish last
    let results = processor
        .process_batch_concurrent(&items, 8, |item| async move {
            let id = item["id"].as_u64().unwrap();
            tokio::time::sleep(std::time::Duration::from_millis((8 - id) * 10)).await;
            if id == 3 {
                Err(format!("item {} rejected", id))
            } else {
                Ok(item)
            }
        })
        .await;

    assert_eq!(results.len(), 8);
    for (i, result) in results.iter().enumerate() {
        if i == 3 {
            assert_eq!(result.error(), Some("item 3 rejected"));
        } else {
            assert_eq!(result.data().unwrap()["id"], json!(i));
        }
    }
    assert_eq!(processor.processed_count(), 7);
}

#[tokio::test]
async fn test_concurrent_batch_respects_parallelism_limit() {
    use std::sync::atomic::{AtomicUsize, Ordering};

    let store = ConfigStore::default();
    let processor = BatchProcessor::new(store.handle());
    let items: Vec<Item> = (0..6).map(|i| item(json!({"id": i}))).collect();
    let in_flight = AtomicUsize::new(0);
    let peak = AtomicUsize::new(0);

    let results = processor
        .process_batch_concurrent(&items, 2, |item| {
            let in_flight = &in_flight;
            let peak = &peak;
            async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(std::time::Duration::from_millis(10)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
                Ok::<_, String>(item)
            }
        })
        .await;

    assert_eq!(results.len(), 6);
    assert!(peak.load(Ordering::SeqCst) <= 2);
    assert_eq!(processor.processed_count(), 6);
}

#[tokio::test]
async fn test_concurrent_batch_times_out_slow_items() {
    let mut store = ConfigStore::default();
    store.set("timeout", 0.05);
    let processor = BatchProcessor::new(store.handle());
    let items = sample_items();

    let results = processor
        .process_batch_concurrent(&items, 3, |item| async move {
            if item["name"] == "Bob" {
                tokio::time::sleep(std::time::Duration::from_secs(5)).await;
            }
            Ok::<_, String>(item)
        })
        .await;

    assert!(results[0].is_success());
    assert!(results[1]
        .error()
        .is_some_and(|e| e.starts_with("transform timed out")));
    assert!(results[2].is_success());
    assert_eq!(processor.processed_count(), 2);
}

#[tokio::test]
async fn test_concurrent_batch_survives_out_of_range_timeout() {
    let mut store = ConfigStore::default();
    store.set("timeout", 1e30);
    let processor = BatchProcessor::new(store.handle());

    let results = processor
        .process_batch_concurrent(&sample_items(), 2, |item| async move {
            Ok::<_, String>(item)
        })
        .await;

    assert_eq!(results.len(), 3);
    assert!(results.iter().all(ProcessResult::is_success));
    assert_eq!(processor.processed_count(), 3);
}

#[tokio::test]
async fn test_concurrent_batch_unusable_timeout_uses_default() {
    let mut store = ConfigStore::default();
    store.set("timeout", "soon");
    let processor = BatchProcessor::new(store.handle());

    let results = processor
        .process_batch_concurrent(&sample_items(), 3, |item| async move {
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            Ok::<_, String>(item)
        })
        .await;

    assert!(results.iter().all(ProcessResult::is_success));
    assert_eq!(
        processor.get_stats().config.timeout(),
        std::time::Duration::from_secs(crate::config::DEFAULT_TIMEOUT_SECS)
    );
}

#[tokio::test]
async fn test_concurrent_batch_zero_parallelism_still_runs() {
    let processor = BatchProcessor::new(ConfigHandle::detached(Config::defaults()));
    let results = processor
        .process_batch_concurrent(&sample_items(), 0, |item| async move {
            Ok::<_, String>(item)
        })
        .await;

    assert_eq!(results.len(), 3);
    assert_eq!(processor.processed_count(), 3);
}

proptest! {
    #[test]
    fn prop_results_match_input_length_and_order(values in prop::collection::vec(-50i64..50, 0..40)) {
        let processor = BatchProcessor::new(ConfigHandle::detached(Config::defaults()));
        let items: Vec<Item> = values.iter().map(|v| item(json!({"value": v}))).collect();

        let results = processor.process_batch(&items, |item| {
            let v = item["value"].as_i64().unwrap();
            if v < 0 { Err(format!("negative: {}", v)) } else { Ok(item.clone()) }
        });

        prop_assert_eq!(results.len(), items.len());
        for (value, result) in values.iter().zip(&results) {
            match result.data() {
                Some(data) => prop_assert_eq!(data["value"].as_i64(), Some(*value)),
                None => {
                    let expected = format!("negative: {}", value);
                    prop_assert_eq!(result.error(), Some(expected.as_str()));
                }
            }
        }
        let non_negative = values.iter().filter(|v| **v >= 0).count() as u64;
        prop_assert_eq!(processor.processed_count(), non_negative);
    }
}
