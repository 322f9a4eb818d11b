//! Typed generation.
//!
//! These wrap [`generate`](crate::generate) for types implementing
//! [`StructuredOutput`], binding the validated document into `T`.

use ideaprobe_models::{BlockingModelInvoker, ModelInvoker};
use ideaprobe_output::StructuredOutput;
use ideaprobe_retries::RetryConfig;

use crate::errors::GenerationResult;
use crate::orchestrator::{generate, generate_blocking};

/// Generate a `T`.
///
/// # Errors
///
/// Everything [`generate`] returns, plus [`GenerationError::Schema`] when
/// `T`'s schema cannot be built and [`GenerationError::Binding`] when the
/// validated document does not deserialize into `T`.
///
/// [`GenerationError::Schema`]: crate::GenerationError::Schema
/// [`GenerationError::Binding`]: crate::GenerationError::Binding
pub async fn generate_output<T: StructuredOutput>(
    prompt: &str,
    invoker: &dyn ModelInvoker,
    config: &RetryConfig,
) -> GenerationResult<T> {
    let schema = T::schema()?;
    let document = generate(&schema, prompt, invoker, config).await?;
    Ok(document.into_typed()?)
}

/// Blocking variant of [`generate_output`].
///
/// # Errors
///
/// See [`generate_output`].
pub fn generate_output_blocking<T: StructuredOutput>(
    prompt: &str,
    invoker: &dyn BlockingModelInvoker,
    config: &RetryConfig,
) -> GenerationResult<T> {
    let schema = T::schema()?;
    let document = generate_blocking(&schema, prompt, invoker, config)?;
    Ok(document.into_typed()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{FailureReason, GenerationError};
    use ideaprobe_models::MockInvoker;
    use ideaprobe_schema::{Field, FieldType, Schema, SchemaResult};
    use pretty_assertions::assert_eq;
    use serde::Deserialize;
    use std::sync::Arc;
    use std::time::Duration;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Insight {
        platform: String,
        score: i64,
        notes: Option<String>,
    }

    impl StructuredOutput for Insight {
        fn schema() -> SchemaResult<Arc<Schema>> {
            Schema::builder("Insight")
                .string("platform")
                .integer("score")
                .field(Field::new("notes", FieldType::String).optional())
                .build()
                .map(Arc::new)
        }
    }

    // Declares `score` as a string, which `Miswired` cannot hold.
    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Miswired {
        score: i64,
    }

    impl StructuredOutput for Miswired {
        fn schema() -> SchemaResult<Arc<Schema>> {
            Schema::builder("Miswired").string("score").build().map(Arc::new)
        }
    }

    #[derive(Debug)]
    struct Broken;

    impl<'de> Deserialize<'de> for Broken {
        fn deserialize<D: serde::Deserializer<'de>>(_: D) -> Result<Self, D::Error> {
            Err(serde::de::Error::custom("never built"))
        }
    }

    impl StructuredOutput for Broken {
        fn schema() -> SchemaResult<Arc<Schema>> {
            Schema::builder("").build().map(Arc::new)
        }
    }

    #[tokio::test]
    async fn test_generate_output_binds() {
        let model = MockInvoker::new("mock")
            .with_text(r#"Here: {"platform": "reddit", "score": 7.0, "extra": true}"#);

        let insight: Insight = generate_output("p", &model, &RetryConfig::default())
            .await
            .unwrap();

        assert_eq!(
            insight,
            Insight {
                platform: "reddit".into(),
                score: 7,
                notes: None,
            }
        );
    }

    #[tokio::test]
    async fn test_binding_mismatch_is_authoring_error() {
        let model = MockInvoker::new("mock").with_text(r#"{"score": "high"}"#);

        let err = generate_output::<Miswired>("p", &model, &RetryConfig::no_retry())
            .await
            .unwrap_err();

        assert!(matches!(err, GenerationError::Binding(_)));
        assert_eq!(err.reason(), FailureReason::SchemaAuthoring);
        assert_eq!(model.calls(), 1);
    }

    #[tokio::test]
    async fn test_unbuildable_schema_skips_model() {
        let model = MockInvoker::new("mock");

        let err = generate_output::<Broken>("p", &model, &RetryConfig::default())
            .await
            .unwrap_err();

        assert!(matches!(err, GenerationError::Schema(_)));
        assert_eq!(model.calls(), 0);
    }

    #[test]
    fn test_generate_output_blocking() {
        let model = MockInvoker::new("mock")
            .with_empty()
            .with_text(r#"{"platform": "hn", "score": 3, "notes": "thin"}"#);
        let config = RetryConfig::new().initial_delay(Duration::from_millis(1));

        let insight: Insight = generate_output_blocking("p", &model, &config).unwrap();

        assert_eq!(insight.notes.as_deref(), Some("thin"));
        assert_eq!(model.calls(), 2);
    }
}
