//! Example document synthesis.
//!
//! Builds a placeholder document with the exact shape of a schema. The
//! rendered example is appended to generation prompts so the model can copy
//! the structure.

use ideaprobe_schema::{FieldType, Schema};
use serde_json::{json, Map, Value as JsonValue};
use tracing::warn;

use crate::validator::validate_document;

/// Number of nested documents produced for a list-of-record field.
pub const LIST_FAN_OUT: usize = 2;

const UNSUPPORTED: &str = "unsupported";

/// Synthesize an example document for `schema`.
///
/// The result always passes validation against `schema`; if the placeholders
/// for some field type would not, an empty object is returned instead.
///
/// # Example
///
/// ```rust
/// use ideaprobe_output::synthesize;
/// use ideaprobe_schema::Schema;
/// use serde_json::json;
///
/// let schema = Schema::builder("KeywordSet").string_list("keywords").build()?;
/// assert_eq!(
///     synthesize(&schema),
///     json!({"keywords": ["generated text 1", "generated text 2"]})
/// );
/// # Ok::<(), ideaprobe_schema::SchemaError>(())
/// ```
#[must_use]
pub fn synthesize(schema: &Schema) -> JsonValue {
    let example = JsonValue::Object(placeholder_document(schema));

    match validate_document(schema, &example) {
        Ok(_) => example,
        Err(issues) => {
            let first = issues.first().map(ToString::to_string).unwrap_or_default();
            warn!(
                schema = schema.name(),
                issues = issues.len(),
                first = %first,
                "Synthesized example failed self-check, using empty object"
            );
            JsonValue::Object(Map::new())
        }
    }
}

/// Synthesize and render as compact JSON text.
#[must_use]
pub fn render_example(schema: &Schema) -> String {
    serde_json::to_string(&synthesize(schema)).unwrap_or_else(|_| "{}".to_string())
}

fn placeholder_document(schema: &Schema) -> Map<String, JsonValue> {
    schema
        .fields()
        .map(|field| (field.name.clone(), placeholder(&field.ty)))
        .collect()
}

fn placeholder(ty: &FieldType) -> JsonValue {
    match ty {
        FieldType::String => json!("example_string"),
        FieldType::Integer => json!(0),
        FieldType::Float => json!(0.0),
        FieldType::Boolean => json!(true),
        FieldType::Object(schema) => JsonValue::Object(placeholder_document(schema)),
        FieldType::List(item) => match item.as_ref() {
            FieldType::String => json!(["generated text 1", "generated text 2"]),
            FieldType::Integer => json!([1, 2, 3]),
            FieldType::Object(schema) => JsonValue::Array(
                (0..LIST_FAN_OUT)
                    .map(|_| JsonValue::Object(placeholder_document(schema)))
                    .collect(),
            ),
            _ => json!(UNSUPPORTED),
        },
        FieldType::Any => json!(UNSUPPORTED),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ideaprobe_schema::Field;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn insight() -> Arc<Schema> {
        Arc::new(
            Schema::builder("PlatformInsight")
                .string("platform")
                .string("insights")
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn test_synthesize_primitives() {
        let schema = Schema::builder("PostAnalysis")
            .boolean("relevant")
            .string_list("pain_points")
            .string("sentiment")
            .integer("engagement_score")
            .float("ratio")
            .field_of("ids", FieldType::list(FieldType::Integer))
            .build()
            .unwrap();

        assert_eq!(
            synthesize(&schema),
            json!({
                "relevant": true,
                "pain_points": ["generated text 1", "generated text 2"],
                "sentiment": "example_string",
                "engagement_score": 0,
                "ratio": 0.0,
                "ids": [1, 2, 3]
            })
        );
    }

    #[test]
    fn test_synthesize_nested_list_fans_out_twice() {
        let schema = Schema::builder("CombinedAnalysis")
            .integer("overall_score")
            .object_list("platform_insights", insight())
            .build()
            .unwrap();

        let example = synthesize(&schema);
        let items = example["platform_insights"].as_array().unwrap();
        assert_eq!(items.len(), LIST_FAN_OUT);
        assert_eq!(
            items[0],
            json!({"platform": "example_string", "insights": "example_string"})
        );
    }

    #[test]
    fn test_synthesize_nested_object() {
        let schema = Schema::builder("Wrapper")
            .object("insight", insight())
            .build()
            .unwrap();
        assert_eq!(
            synthesize(&schema),
            json!({"insight": {"platform": "example_string", "insights": "example_string"}})
        );
    }

    #[test]
    fn test_synthesize_has_exact_field_set() {
        let schema = Schema::builder("Post")
            .string("title")
            .field(Field::new("url", FieldType::String).optional())
            .build()
            .unwrap();

        let example = synthesize(&schema);
        let keys: Vec<_> = example.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["title", "url"]);
    }

    #[test]
    fn test_synthesize_deep_nesting_terminates() {
        let mut schema = Arc::new(Schema::builder("Level0").string("leaf").build().unwrap());
        for depth in 1..20 {
            schema = Arc::new(
                Schema::builder(format!("Level{}", depth))
                    .object("child", schema)
                    .build()
                    .unwrap(),
            );
        }

        let mut node = synthesize(&schema);
        for _ in 1..20 {
            node = node["child"].clone();
        }
        assert_eq!(node, json!({"leaf": "example_string"}));
    }

    #[test]
    fn test_unsupported_type_falls_back_to_empty_object() {
        let schema = Schema::builder("Odd")
            .string("name")
            .field_of("flags", FieldType::list(FieldType::Boolean))
            .build()
            .unwrap();
        assert_eq!(synthesize(&schema), json!({}));
    }

    #[test]
    fn test_render_example_is_compact() {
        let schema = Schema::builder("KeywordSet")
            .string_list("keywords")
            .build()
            .unwrap();
        assert_eq!(
            render_example(&schema),
            r#"{"keywords":["generated text 1","generated text 2"]}"#
        );
    }
}
