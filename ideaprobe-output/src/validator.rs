//! Schema validation of extracted documents.
//!
//! Every input document ends up in exactly one of
//! [`ValidationOutcome::validated`] or [`ValidationOutcome::errors`].

use ideaprobe_schema::{FieldType, Schema};
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use std::fmt;
use std::slice;

use crate::error::{json_kind, InvalidInputKind};
use crate::types::TypedDocument;

/// One problem with one field of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    /// Path to the field, e.g. `platform_insights[1].platform`.
    pub path: String,
    /// What the schema declares.
    pub expected: String,
    /// What the document holds (`missing` when absent).
    pub found: String,
}

impl FieldIssue {
    fn new(path: impl Into<String>, expected: impl ToString, found: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            expected: expected.to_string(),
            found: found.into(),
        }
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "field `{}`: expected {}, found {}",
            self.path, self.expected, self.found
        )
    }
}

/// A document that failed validation, with its diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationFailure {
    /// Everything wrong with the document.
    pub issues: Vec<FieldIssue>,
    /// The offending document as extracted.
    pub document: JsonValue,
}

impl ValidationFailure {
    /// Human-readable summary of all issues.
    #[must_use]
    pub fn message(&self) -> String {
        self.issues
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Result of validating a set of documents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationOutcome {
    /// Documents that matched the schema, in input order.
    pub validated: Vec<TypedDocument>,
    /// Documents that did not, in input order.
    pub errors: Vec<ValidationFailure>,
}

impl ValidationOutcome {
    /// Total number of documents seen.
    #[must_use]
    pub fn len(&self) -> usize {
        self.validated.len() + self.errors.len()
    }

    /// Whether no documents were seen.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// At least one document validated and none failed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && !self.validated.is_empty()
    }

    /// Take the first validated document.
    #[must_use]
    pub fn into_first(self) -> Option<TypedDocument> {
        self.validated.into_iter().next()
    }
}

/// Validate a single document or a list of documents.
///
/// # Errors
///
/// Returns [`InvalidInputKind`] when `input` is neither an object nor a list.
///
/// # Example
///
/// ```rust
/// use ideaprobe_output::validate;
/// use ideaprobe_schema::Schema;
/// use serde_json::json;
///
/// let schema = Schema::builder("KeywordSet").string_list("keywords").build()?;
///
/// let outcome = validate(&schema, &json!([{"keywords": ["a"]}, {"keywords": "a"}]))?;
/// assert_eq!(outcome.validated.len(), 1);
/// assert_eq!(outcome.errors.len(), 1);
///
/// assert!(validate(&schema, &json!("not a document")).is_err());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn validate(schema: &Schema, input: &JsonValue) -> Result<ValidationOutcome, InvalidInputKind> {
    match input {
        JsonValue::Object(_) => Ok(validate_documents(schema, slice::from_ref(input))),
        JsonValue::Array(items) => Ok(validate_documents(schema, items)),
        other => Err(InvalidInputKind::new(json_kind(other))),
    }
}

/// Validate an already extracted list of documents.
pub fn validate_documents(schema: &Schema, documents: &[JsonValue]) -> ValidationOutcome {
    let mut outcome = ValidationOutcome::default();

    for document in documents {
        match validate_document(schema, document) {
            Ok(fields) => outcome
                .validated
                .push(TypedDocument::new(schema.name(), fields)),
            Err(issues) => outcome.errors.push(ValidationFailure {
                issues,
                document: document.clone(),
            }),
        }
    }

    outcome
}

/// Validate one document, returning its projection onto the schema.
///
/// Keys the schema does not declare are dropped; absent optional fields
/// become `null`.
pub fn validate_document(
    schema: &Schema,
    document: &JsonValue,
) -> Result<Map<String, JsonValue>, Vec<FieldIssue>> {
    let mut issues = Vec::new();

    let Some(object) = document.as_object() else {
        issues.push(FieldIssue::new(
            "<root>",
            format!("object {}", schema.name()),
            json_kind(document),
        ));
        return Err(issues);
    };

    let fields = check_fields(schema, object, "", &mut issues);
    if issues.is_empty() {
        Ok(fields)
    } else {
        Err(issues)
    }
}

fn check_fields(
    schema: &Schema,
    object: &Map<String, JsonValue>,
    prefix: &str,
    issues: &mut Vec<FieldIssue>,
) -> Map<String, JsonValue> {
    let mut bound = Map::with_capacity(schema.len());

    for field in schema.fields() {
        let path = if prefix.is_empty() {
            field.name.clone()
        } else {
            format!("{}.{}", prefix, field.name)
        };

        match object.get(&field.name) {
            None | Some(JsonValue::Null) if !field.required => {
                bound.insert(field.name.clone(), JsonValue::Null);
            }
            None => issues.push(FieldIssue::new(path, &field.ty, "missing")),
            Some(value) => {
                if let Some(value) = check_value(&field.ty, value, &path, issues) {
                    bound.insert(field.name.clone(), value);
                }
            }
        }
    }

    bound
}

fn check_value(
    ty: &FieldType,
    value: &JsonValue,
    path: &str,
    issues: &mut Vec<FieldIssue>,
) -> Option<JsonValue> {
    let checked = match (ty, value) {
        (FieldType::Any, v) => Some(v.clone()),
        (FieldType::String, JsonValue::String(_)) => Some(value.clone()),
        (FieldType::Boolean, JsonValue::Bool(_)) => Some(value.clone()),
        (FieldType::Float, JsonValue::Number(_)) => Some(value.clone()),
        (FieldType::Integer, JsonValue::Number(n)) => {
            if n.is_i64() {
                Some(value.clone())
            } else {
                n.as_f64().and_then(integral).map(JsonValue::from)
            }
        }
        (FieldType::Object(schema), JsonValue::Object(object)) => {
            let before = issues.len();
            let fields = check_fields(schema, object, path, issues);
            (issues.len() == before).then_some(JsonValue::Object(fields))
        }
        (FieldType::List(item), JsonValue::Array(items)) => {
            let before = issues.len();
            let checked: Vec<JsonValue> = items
                .iter()
                .enumerate()
                .filter_map(|(i, v)| check_value(item, v, &format!("{}[{}]", path, i), issues))
                .collect();
            (issues.len() == before).then_some(JsonValue::Array(checked))
        }
        _ => None,
    };

    if checked.is_none() && !structurally_matches(ty, value) {
        issues.push(FieldIssue::new(path, ty, json_kind(value)));
    }

    checked
}

/// Whether a container value has the right outer shape. Inner problems are
/// reported by the recursive call and must not be reported twice.
fn structurally_matches(ty: &FieldType, value: &JsonValue) -> bool {
    matches!(
        (ty, value),
        (FieldType::Object(_), JsonValue::Object(_)) | (FieldType::List(_), JsonValue::Array(_))
    )
}

/// 2^63, the first float past `i64::MAX`.
const I64_UPPER: f64 = 9_223_372_036_854_775_808.0;

/// Accept floats with no fractional part as integers, as long as they fit
/// an `i64` exactly.
fn integral(f: f64) -> Option<i64> {
    if f.is_finite() && f.fract() == 0.0 && f >= -I64_UPPER && f < I64_UPPER {
        Some(f as i64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ideaprobe_schema::Field;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    fn keywords() -> Schema {
        Schema::builder("KeywordSet")
            .string_list("keywords")
            .build()
            .unwrap()
    }

    fn combined() -> Schema {
        let insight = Schema::builder("PlatformInsight")
            .string("platform")
            .string("insights")
            .build()
            .unwrap();
        Schema::builder("CombinedAnalysis")
            .integer("overall_score")
            .string("market_validation_summary")
            .object_list("platform_insights", insight)
            .build()
            .unwrap()
    }

    #[test]
    fn test_validate_single_object() {
        let outcome = validate(&keywords(), &json!({"keywords": ["a", "b"]})).unwrap();
        assert!(outcome.is_clean());
        assert_eq!(
            outcome.validated[0].to_value(),
            json!({"keywords": ["a", "b"]})
        );
    }

    #[test]
    fn test_validate_wrong_type_reports_path_and_kinds() {
        let outcome = validate(&keywords(), &json!({"keywords": "not-a-list"})).unwrap();
        assert!(outcome.validated.is_empty());
        assert_eq!(outcome.errors.len(), 1);

        let failure = &outcome.errors[0];
        assert_eq!(
            failure.issues,
            vec![FieldIssue::new("keywords", "list of string", "string")]
        );
        assert_eq!(failure.document, json!({"keywords": "not-a-list"}));
        assert_eq!(
            failure.message(),
            "field `keywords`: expected list of string, found string"
        );
    }

    #[test]
    fn test_validate_missing_field() {
        let outcome = validate(&keywords(), &json!({"other": 1})).unwrap();
        assert_eq!(
            outcome.errors[0].issues,
            vec![FieldIssue::new("keywords", "list of string", "missing")]
        );
    }

    #[test]
    fn test_validate_null_required_field() {
        let outcome = validate(&keywords(), &json!({"keywords": null})).unwrap();
        assert_eq!(outcome.errors[0].issues[0].found, "null");
    }

    #[test]
    fn test_validate_bad_list_element() {
        let outcome = validate(&keywords(), &json!({"keywords": ["a", 2]})).unwrap();
        assert_eq!(
            outcome.errors[0].issues,
            vec![FieldIssue::new("keywords[1]", "string", "integer")]
        );
    }

    #[test]
    fn test_validate_nested_path() {
        let doc = json!({
            "overall_score": 70,
            "market_validation_summary": "ok",
            "platform_insights": [
                {"platform": "Reddit", "insights": "x"},
                {"platform": 3, "insights": "y"}
            ]
        });
        let outcome = validate(&combined(), &doc).unwrap();
        assert_eq!(
            outcome.errors[0].issues,
            vec![FieldIssue::new(
                "platform_insights[1].platform",
                "string",
                "integer"
            )]
        );
    }

    #[test]
    fn test_validate_nested_wrong_container() {
        let doc = json!({
            "overall_score": 70,
            "market_validation_summary": "ok",
            "platform_insights": {"platform": "Reddit"}
        });
        let outcome = validate(&combined(), &doc).unwrap();
        assert_eq!(
            outcome.errors[0].issues,
            vec![FieldIssue::new(
                "platform_insights",
                "list of object PlatformInsight",
                "object"
            )]
        );
    }

    #[test]
    fn test_validate_collects_all_issues() {
        let doc = json!({"overall_score": "high"});
        let outcome = validate(&combined(), &doc).unwrap();
        let paths: Vec<_> = outcome.errors[0]
            .issues
            .iter()
            .map(|i| i.path.as_str())
            .collect();
        assert_eq!(
            paths,
            vec![
                "overall_score",
                "market_validation_summary",
                "platform_insights"
            ]
        );
    }

    #[test]
    fn test_validate_drops_unknown_keys() {
        let outcome = validate(&keywords(), &json!({"keywords": [], "extra": true})).unwrap();
        assert_eq!(outcome.validated[0].to_value(), json!({"keywords": []}));
    }

    #[test]
    fn test_validate_optional_field() {
        let schema = Schema::builder("Post")
            .string("title")
            .field(Field::new("url", FieldType::String).optional())
            .build()
            .unwrap();

        let outcome = validate(&schema, &json!({"title": "t"})).unwrap();
        assert_eq!(
            outcome.validated[0].to_value(),
            json!({"title": "t", "url": null})
        );

        let outcome = validate(&schema, &json!({"title": "t", "url": 5})).unwrap();
        assert_eq!(outcome.errors.len(), 1);
    }

    #[rstest]
    #[case(json!(7), true)]
    #[case(json!(7.0), true)]
    #[case(json!(7.5), false)]
    #[case(json!("7"), false)]
    #[case(json!(true), false)]
    fn test_integer_acceptance(#[case] value: JsonValue, #[case] accepted: bool) {
        let schema = Schema::builder("Score").integer("score").build().unwrap();
        let outcome = validate(&schema, &json!({ "score": value })).unwrap();
        assert_eq!(outcome.is_clean(), accepted);
        if accepted {
            assert_eq!(outcome.validated[0].get("score"), Some(&json!(7)));
        }
    }

    #[rstest]
    #[case(json!(i64::MAX), true)]
    #[case(json!(i64::MIN), true)]
    #[case(json!(u64::MAX), false)]
    #[case(json!(9_223_372_036_854_775_808_u64), false)]
    #[case(json!(9.223372036854775808e18), false)]
    #[case(json!(-9.223372036854775808e18), true)]
    fn test_integer_range_fits_i64(#[case] value: JsonValue, #[case] accepted: bool) {
        let schema = Schema::builder("Score").integer("score").build().unwrap();
        let outcome = validate(&schema, &json!({ "score": value })).unwrap();
        assert_eq!(outcome.is_clean(), accepted);
    }

    #[test]
    fn test_float_accepts_integer() {
        let schema = Schema::builder("Ratio").float("ratio").build().unwrap();
        let outcome = validate(&schema, &json!({"ratio": 1})).unwrap();
        assert!(outcome.is_clean());
    }

    #[test]
    fn test_validate_list_partitions_every_element() {
        let input = json!([
            {"keywords": ["a"]},
            {"keywords": "a"},
            "stray string",
            {"keywords": ["b"]},
            42
        ]);
        let outcome = validate(&keywords(), &input).unwrap();

        assert_eq!(outcome.validated.len(), 2);
        assert_eq!(outcome.errors.len(), 3);
        assert_eq!(outcome.len(), 5);
        assert_eq!(outcome.errors[1].issues[0].path, "<root>");
        assert!(!outcome.is_clean());
    }

    #[rstest]
    #[case(json!("text"), "string")]
    #[case(json!(1), "integer")]
    #[case(json!(null), "null")]
    #[case(json!(false), "boolean")]
    fn test_validate_rejects_bare_scalars(#[case] input: JsonValue, #[case] kind: &'static str) {
        assert_eq!(
            validate(&keywords(), &input).unwrap_err(),
            InvalidInputKind::new(kind)
        );
    }

    #[test]
    fn test_validate_empty_list() {
        let outcome = validate(&keywords(), &json!([])).unwrap();
        assert!(outcome.is_empty());
        assert!(!outcome.is_clean());
    }

    #[test]
    fn test_into_first_keeps_order() {
        let outcome =
            validate(&keywords(), &json!([{"keywords": ["1"]}, {"keywords": ["2"]}])).unwrap();
        let first = outcome.into_first().unwrap();
        assert_eq!(first.get("keywords"), Some(&json!(["1"])));
    }
}
