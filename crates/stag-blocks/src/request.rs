//! Decoding of raw request bytes into a payload object.

use serde_json::{Map, Value};

use crate::errors::RequestError;

/// A decoded request payload: the producer's JSON object, key order intact.
pub type Payload = Map<String, Value>;

/// Decodes one request into a JSON object.
///
/// Trailing whitespace (including a newline delimiter) is ignored.
///
/// # Errors
///
/// Returns [`RequestError::DecodeFailure`] when the bytes are empty, are not
/// valid JSON, or hold a JSON value other than an object.
pub fn decode_request(bytes: &[u8]) -> Result<Payload, RequestError> {
    let trimmed = trim_trailing_whitespace(bytes);
    if trimmed.is_empty() {
        return Err(RequestError::decode_failure("empty request"));
    }
    match serde_json::from_slice::<Value>(trimmed) {
        Ok(Value::Object(payload)) => Ok(payload),
        Ok(other) => Err(RequestError::decode_failure(format!(
            "expected a JSON object, found {}",
            value_kind(&other)
        ))),
        Err(error) => Err(RequestError::decode_failure(error.to_string())),
    }
}

/// Names a JSON value's type for diagnostics.
pub(crate) const fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn trim_trailing_whitespace(bytes: &[u8]) -> &[u8] {
    let end = bytes
        .iter()
        .rposition(|byte| !byte.is_ascii_whitespace())
        .map_or(0, |pos| pos + 1);
    bytes.get(..end).unwrap_or_default()
}
