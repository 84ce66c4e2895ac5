//! Content checksums for generated documents
//!
//! A generated document stores the SHA-256 of its content so that a copy
//! read back from storage can be checked against what was produced.

use crate::domain::Result;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// SHA-256 of canonical JSON (object keys sorted, no whitespace)
///
/// # Examples
///
/// ```
/// use clinidoc::core::checksum::calculate_checksum;
/// use serde_json::json;
///
/// let a = calculate_checksum(&json!({"b": 1, "a": 2})).unwrap();
/// let b = calculate_checksum(&json!({"a": 2, "b": 1})).unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.len(), 64);
/// ```
pub fn calculate_checksum(data: &Value) -> Result<String> {
    let data_str = serde_json::to_string(&normalize_json(data))?;
    Ok(calculate_checksum_bytes(data_str.as_bytes()))
}

/// SHA-256 of raw bytes, hex encoded
pub fn calculate_checksum_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

fn normalize_json(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<String, Value> = map
                .iter()
                .map(|(k, v)| (k.clone(), normalize_json(v)))
                .collect();
            Value::Object(sorted.into_iter().collect())
        }
        Value::Array(arr) => Value::Array(arr.iter().map(normalize_json).collect()),
        _ => value.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_checksum_changes_with_content() {
        let a = calculate_checksum(&json!({"text": "Jane Doe"})).unwrap();
        let b = calculate_checksum(&json!({"text": "Jane Roe"})).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_nested_key_order_does_not_matter() {
        let a = calculate_checksum(&json!({"form": {"x": 1, "y": [{"b": 1, "a": 2}]}})).unwrap();
        let b = calculate_checksum(&json!({"form": {"y": [{"a": 2, "b": 1}], "x": 1}})).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_known_digest() {
        assert_eq!(
            calculate_checksum_bytes(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
