//! Thin adapter over `serde_json`, the codec used for text ↔ value conversion.
//!
//! Everything that touches JSON text goes through here so codec failures are
//! mapped onto [`NodeError`] in one place. The workspace enables serde_json's
//! `preserve_order` feature, so object keys come back out in the order they
//! were read.

use crate::error::{NodeError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Parse raw JSON bytes into a value tree.
pub fn decode(bytes: &[u8]) -> Result<Value> {
    serde_json::from_slice(bytes).map_err(|err| NodeError::Parse {
        line: err.line(),
        column: err.column(),
        message: err.to_string(),
    })
}

/// Encode a value tree as compact JSON text.
pub fn encode(value: &Value) -> Result<String> {
    serde_json::to_string(value).map_err(|err| NodeError::Encode(err.to_string()))
}

/// Encode a value tree as indented JSON text.
pub fn encode_pretty(value: &Value) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|err| NodeError::Encode(err.to_string()))
}

/// Convert any serializable value into a value tree.
pub fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(|err| NodeError::Encode(err.to_string()))
}

/// Decode a value tree into a concrete shape by encoding it to text and
/// decoding that text, so the target sees exactly the codec's decode rules.
pub fn decode_into<T: DeserializeOwned>(value: &Value) -> Result<T> {
    let bytes = serde_json::to_vec(value).map_err(|err| NodeError::Encode(err.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|err| NodeError::Decode(err.to_string()))
}

/// Short name of a value's kind, used in type errors and log lines.
pub fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decode_reports_position_of_malformed_input() {
        let err = decode(br#"{"name":"John Doe", "age": 30, "oops"}"#).unwrap_err();
        match err {
            NodeError::Parse { line, column, .. } => {
                assert_eq!(line, 1);
                assert!(column > 0);
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn encode_keeps_key_order() {
        let value = decode(br#"{"zeta":1,"alpha":2,"mid":3}"#).unwrap();
        assert_eq!(encode(&value).unwrap(), r#"{"zeta":1,"alpha":2,"mid":3}"#);
    }

    #[test]
    fn decode_into_narrows_numbers() {
        let n: u8 = decode_into(&json!(42)).unwrap();
        assert_eq!(n, 42);
        let f: f64 = decode_into(&json!(42)).unwrap();
        assert_eq!(f, 42.0);
    }

    #[test]
    fn decode_into_reports_shape_mismatch() {
        let err = decode_into::<Vec<String>>(&json!({"a": 1})).unwrap_err();
        assert!(matches!(err, NodeError::Decode(_)));
    }

    #[test]
    fn kind_names_cover_every_variant() {
        assert_eq!(kind_name(&json!(null)), "null");
        assert_eq!(kind_name(&json!(true)), "boolean");
        assert_eq!(kind_name(&json!(1.5)), "number");
        assert_eq!(kind_name(&json!("s")), "string");
        assert_eq!(kind_name(&json!([])), "array");
        assert_eq!(kind_name(&json!({})), "object");
    }
}
