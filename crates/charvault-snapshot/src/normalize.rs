//! Canonical string form of section values, used for comparison and display.

use crate::document::SectionValue;
use serde_json::{Map, Value};
use tracing::warn;

/// Convert a section value to its canonical string.
///
/// - text is returned unchanged
/// - lists are joined with `\n`
/// - records are pretty-printed with sorted keys, so an unchanged record
///   always normalizes to the same bytes
/// - images normalize to their reference
///
/// Never fails: an unrecognized value is logged and treated as empty so one
/// malformed section cannot block the rest of a diff.
pub fn normalize(value: &SectionValue) -> String {
    match value {
        SectionValue::Empty => String::new(),
        SectionValue::Text(s) => s.clone(),
        SectionValue::List(items) => items.join("\n"),
        SectionValue::Record(record) => normalize_record(record),
        SectionValue::Image(reference) => reference.clone(),
        SectionValue::Unrecognized { kind, .. } => {
            warn!(kind = %kind, "Unrecognized section value, normalizing as empty");
            String::new()
        }
    }
}

fn normalize_record(record: &Value) -> String {
    match record {
        Value::Null => String::new(),
        other => match serde_json::to_string_pretty(&sort_keys(other)) {
            Ok(s) => s,
            Err(e) => {
                warn!(error = %e, "Failed to serialize record, normalizing as empty");
                String::new()
            }
        },
    }
}

/// Rebuild a JSON value with object keys in sorted order at every depth.
fn sort_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut sorted = Map::new();
            for key in keys {
                sorted.insert(key.clone(), sort_keys(&map[key]));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(sort_keys).collect()),
        other => other.clone(),
    }
}
