//! Error types for output validation and binding.

use thiserror::Error;

/// The validator was handed something other than an object or a list.
///
/// This is a caller error and is raised immediately instead of being
/// coerced into an error entry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Invalid input kind: expected a JSON object or list, found {found}")]
pub struct InvalidInputKind {
    /// Kind of JSON value that was supplied.
    pub found: &'static str,
}

impl InvalidInputKind {
    /// Create a new invalid input error.
    #[must_use]
    pub fn new(found: &'static str) -> Self {
        Self { found }
    }
}

/// A validated document could not be deserialized into the requested type.
///
/// Validation already succeeded at this point, so the Rust type and its
/// declared schema disagree.
#[derive(Debug, Error)]
#[error("Failed to bind '{schema}' document: {source}")]
pub struct BindError {
    /// Schema the document was validated against.
    pub schema: String,
    /// Underlying deserialization error.
    #[source]
    pub source: serde_json::Error,
}

/// Name of a JSON value's kind, for diagnostics.
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;

    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "float",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn test_invalid_input_kind_message() {
        let err = InvalidInputKind::new("string");
        assert!(err.to_string().contains("found string"));
    }

    #[rstest]
    #[case(json!(null), "null")]
    #[case(json!(true), "boolean")]
    #[case(json!(3), "integer")]
    #[case(json!(3.5), "float")]
    #[case(json!("x"), "string")]
    #[case(json!([1]), "list")]
    #[case(json!({"a": 1}), "object")]
    fn test_json_kind(#[case] value: serde_json::Value, #[case] expected: &str) {
        assert_eq!(json_kind(&value), expected);
    }
}
