//! Ready-made item transforms

use super::result::Item;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use std::convert::Infallible;

/// Copy the item and stamp it with `processed: true` and `processed_at`
pub fn mark_processed(
    processed_at: DateTime<Utc>,
) -> impl Fn(&Item) -> Result<Item, Infallible> + Clone {
    let stamp = processed_at.to_rfc3339_opts(SecondsFormat::Micros, true);
    move |item: &Item| {
        let mut processed = item.clone();
        processed.insert("processed".to_string(), Value::Bool(true));
        processed.insert("processed_at".to_string(), Value::String(stamp.clone()));
        Ok(processed)
    }
}

/// Fail items that lack any of `fields`
pub fn require_fields(
    fields: &[&str],
) -> impl Fn(&Item) -> Result<Item, String> + Clone {
    let fields: Vec<String> = fields.iter().map(|f| f.to_string()).collect();
    move |item: &Item| {
        match fields.iter().find(|field| !item.contains_key(field.as_str())) {
            Some(missing) => Err(format!("missing required field '{}'", missing)),
            None => Ok(item.clone()),
        }
    }
}
