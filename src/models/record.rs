use crate::error::{DataspotError, Result};
use serde_json::Value;

/// A single input record: a flat JSON object
pub type Record = serde_json::Map<String, Value>;

/// Text form of a value as it appears in pattern paths
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Convert a JSON array of objects into records
pub fn records_from_json(value: Value) -> Result<Vec<Record>> {
    let Value::Array(items) = value else {
        return Err(DataspotError::data("Data must be an array of objects"));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(map) => Ok(map),
            other => Err(DataspotError::data(format!(
                "Record {} is not an object (found {})",
                index,
                json_kind(&other)
            ))),
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
