//! Interpretation of response bodies shared by every request.

use crate::error::Result;
use serde_json::{json, Value};

pub fn is_json(content_type: Option<&str>) -> bool {
    content_type
        .map(|ct| ct.to_ascii_lowercase().contains("application/json"))
        .unwrap_or(false)
}

/// JSON bodies are parsed as-is. Any other non-empty body becomes
/// `{"message": text}`. An empty body is `Null`.
pub fn interpret_body(content_type: Option<&str>, text: &str) -> Result<Value> {
    if is_json(content_type) {
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        return Ok(serde_json::from_str(text)?);
    }

    if text.is_empty() {
        Ok(Value::Null)
    } else {
        Ok(json!({ "message": text }))
    }
}

/// Message for a failed request: `error`, then `message`, then a generic one.
pub fn error_message(data: &Value, status: u16) -> String {
    ["error", "message"]
        .iter()
        .find_map(|field| data.get(field).and_then(truthy_text))
        .unwrap_or_else(|| format!("Request failed with {status}"))
}

fn truthy_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}
