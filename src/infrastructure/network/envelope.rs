//! Response envelope normalization.
//!
//! List endpoints answer with a plain array, with `{ "data": [...] }` /
//! `{ "results": [...] }`, or with an index-keyed object such as
//! `{ "0": {...}, "1": {...}, "timestamp": ..., "status": ... }`.
//! Everything that consumes list-shaped responses goes through here.

use crate::domain::error::HrmError;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

const WRAPPER_FIELDS: [&str; 2] = ["data", "results"];
const METADATA_FIELDS: [&str; 2] = ["timestamp", "status"];

/// Decode a list-shaped response into typed elements, in index order.
pub fn decode_list<T: DeserializeOwned>(value: Value) -> Result<Vec<T>, HrmError> {
    entries(value)?
        .into_iter()
        .enumerate()
        .map(|(idx, item)| {
            serde_json::from_value(item)
                .map_err(|e| HrmError::Decode(format!("list element {}: {}", idx, e)))
        })
        .collect()
}

/// Decode an object response, unwrapping a `data` object when present.
pub fn decode_object<T: DeserializeOwned>(value: Value) -> Result<T, HrmError> {
    let inner = match value {
        Value::Object(mut map) if matches!(map.get("data"), Some(Value::Object(_))) => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    };

    if !inner.is_object() {
        return Err(HrmError::Decode(format!(
            "expected an object, got {}",
            kind(&inner)
        )));
    }

    serde_json::from_value(inner).map_err(|e| HrmError::Decode(e.to_string()))
}

fn entries(value: Value) -> Result<Vec<Value>, HrmError> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => {
            if let Some(field) = WRAPPER_FIELDS
                .iter()
                .find(|f| matches!(map.get(**f), Some(Value::Array(_) | Value::Object(_))))
            {
                let inner = map.remove(*field).unwrap_or(Value::Null);
                return entries(inner);
            }
            Ok(indexed_values(map))
        }
        other => Err(HrmError::Decode(format!(
            "expected a list, got {}",
            kind(&other)
        ))),
    }
}

fn indexed_values(map: Map<String, Value>) -> Vec<Value> {
    let other_fields: Vec<&String> = map
        .keys()
        .filter(|key| !METADATA_FIELDS.contains(&key.as_str()) && key.parse::<u32>().is_err())
        .collect();
    if !other_fields.is_empty() && other_fields.len() + metadata_count(&map) == map.len() {
        debug!(fields = ?other_fields, "object response has no indexed entries, decoding as an empty list");
    }

    let mut indexed: Vec<(u32, Value)> = map
        .into_iter()
        .filter(|(key, _)| !METADATA_FIELDS.contains(&key.as_str()))
        .filter_map(|(key, value)| key.parse::<u32>().ok().map(|idx| (idx, value)))
        .collect();
    indexed.sort_by_key(|(idx, _)| *idx);
    indexed.into_iter().map(|(_, value)| value).collect()
}

fn metadata_count(map: &Map<String, Value>) -> usize {
    METADATA_FIELDS.iter().filter(|f| map.contains_key(**f)).count()
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
