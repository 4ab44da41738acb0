//! Loading records from the analytics JSON payload.
//!
//! The payload is an array of flat objects keyed by camelCase field names.
//! Two normalizations happen here, once, before any pipeline stage runs:
//! - an array-valued `acceptableMessages` is joined with `", "`
//! - `sortingStage` is derived from the timestamps when absent

use std::path::Path;

use serde_json::Value;
use tracing::debug;

use super::{FieldValue, Record, fields};
use crate::errors::IngestError;

/// Read and decode a records file.
pub fn load_records(path: &Path) -> Result<Vec<Record>, IngestError> {
    let content = std::fs::read_to_string(path).map_err(|source| IngestError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })?;
    let records = parse_records(&content)?;
    debug!(path = %path.display(), count = records.len(), "loaded records");
    Ok(records)
}

/// Decode records from a JSON string.
pub fn parse_records(content: &str) -> Result<Vec<Record>, IngestError> {
    let value: Value = serde_json::from_str(content).map_err(IngestError::InvalidJson)?;
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(IngestError::NotAnArray {
                found: json_type_name(&other),
            });
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(map) => Ok(Record::from_fields(
                map.into_iter()
                    .map(|(key, value)| {
                        let field = to_field_value(&key, value);
                        (key, field)
                    }),
            )),
            _ => Err(IngestError::RecordNotObject { index }),
        })
        .collect()
}

fn to_field_value(key: &str, value: Value) -> FieldValue {
    match value {
        Value::Null => FieldValue::Null,
        Value::Bool(b) => FieldValue::Bool(b),
        Value::Number(n) => n
            .as_f64()
            .map(FieldValue::Number)
            .unwrap_or_else(|| FieldValue::Text(n.to_string())),
        Value::String(s) => FieldValue::Text(s),
        Value::Array(items) if key == fields::ACCEPTABLE_MESSAGES => FieldValue::Text(
            items
                .into_iter()
                .map(|item| match item {
                    Value::String(s) => s,
                    Value::Null => String::new(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(", "),
        ),
        other => FieldValue::Text(other.to_string()),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
