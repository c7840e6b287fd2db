//! JSON document view of a value set.
//!
//! Parsing is permissive about keys (unknown ids pass through) and strict
//! about shape and value types.

use serde_json::{Map, Number, Value};

use super::ValueSet;
use crate::error::DocumentError;

/// Parse raw document text into a fresh value set.
pub fn parse_document(raw: &str) -> Result<ValueSet, DocumentError> {
    if raw.trim().is_empty() {
        return Err(DocumentError::Parse("document is empty".to_string()));
    }

    let parsed: Value = serde_json::from_str(raw).map_err(|e| DocumentError::Parse(e.to_string()))?;

    let object = match parsed {
        Value::Object(map) => map,
        other => return Err(DocumentError::Schema { found: json_kind(&other) }),
    };

    let invalid: Vec<String> = object
        .iter()
        .filter(|(_, v)| !v.is_number())
        .map(|(k, _)| k.clone())
        .collect();
    if !invalid.is_empty() {
        return Err(DocumentError::Type { keys: invalid });
    }

    Ok(object
        .iter()
        .filter_map(|(k, v)| v.as_f64().map(|n| (k.clone(), n)))
        .collect())
}

/// Pretty-printed document of every set field. Unset fields are omitted.
pub fn render_document(values: &ValueSet) -> String {
    let mut map = Map::new();
    for (id, value) in values.numbers() {
        if let Some(number) = to_json_number(value) {
            map.insert(id.to_string(), Value::Number(number));
        }
    }
    serde_json::to_string_pretty(&Value::Object(map)).unwrap_or_else(|_| "{}".to_string())
}

/// Whole numbers are written without a trailing `.0`, like a browser would.
/// Negative zero keeps its sign.
fn to_json_number(value: f64) -> Option<Number> {
    let negative_zero = value == 0.0 && value.is_sign_negative();
    if value.fract() == 0.0 && value.abs() < 1e15 && !negative_zero {
        Some(Number::from(value as i64))
    } else {
        Number::from_f64(value)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
