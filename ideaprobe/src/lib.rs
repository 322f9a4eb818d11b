//! # ideaprobe
//!
//! Reliable structured output from language models, and a business-idea
//! validator built on it.
//!
//! Declare the shape of a record as a [`Schema`], hand a prompt and a model
//! to [`generate`], and get back a [`TypedDocument`] that is guaranteed to
//! match the schema, or a [`GenerationError`] saying why none could be had.
//! Between the two, the orchestrator shows the model an example, digs JSON
//! out of free-form replies, validates it and retries with exponential
//! backoff.
//!
//! ## Quick Start
//!
//! ```rust
//! use ideaprobe::prelude::*;
//! use std::time::Duration;
//!
//! # tokio_test::block_on(async {
//! let schema = Schema::builder("KeywordSet").string_list("keywords").build()?;
//! let model = MockInvoker::new("demo")
//!     .with_empty()
//!     .with_text("Sure! ```json\n{\"keywords\": [\"pet sitting\", \"dog walker\"]}\n```");
//! let config = RetryConfig::new().initial_delay(Duration::from_millis(1));
//!
//! let document = generate(&schema, "Suggest search keywords", &model, &config).await?;
//! assert_eq!(document.get("keywords").unwrap()[0], "pet sitting");
//! assert_eq!(model.calls(), 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! # });
//! ```
//!
//! ## Architecture
//!
//! | Crate | Purpose |
//! |-------|---------|
//! | [`schema`] | Record schemas and the schema registry |
//! | [`output`] | JSON extraction, validation and example synthesis |
//! | [`retries`] | Retry policy and backoff |
//! | [`models`] | Model invokers, mocks and an OpenAI-compatible client |
//! | [`generation`] | The generation orchestrator |
//!
//! The [`analyzer`] module turns scraped [`Post`]s into a
//! [`CombinedAnalysis`] of a business idea, falling back to locally built
//! records whenever generation fails.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod analyzer;
pub mod post;
mod prompts;
pub mod records;
pub mod schemas;

// ============================================================================
// Crate Re-exports
// ============================================================================

/// Record schemas and the schema registry.
pub use ideaprobe_schema as schema;

/// JSON extraction, validation and example synthesis.
pub use ideaprobe_output as output;

/// Retry policy and backoff.
pub use ideaprobe_retries as retries;

/// Model invokers.
pub use ideaprobe_models as models;

/// The generation orchestrator.
pub use ideaprobe_generate as generation;

// ============================================================================
// Flat Re-exports
// ============================================================================

// Schema
pub use ideaprobe_schema::{Field, FieldType, Schema, SchemaBuilder, SchemaError, SchemaRegistry};

// Output
pub use ideaprobe_output::{
    extract, render_example, synthesize, validate, FieldIssue, StructuredOutput, TypedDocument,
    ValidationFailure, ValidationOutcome,
};

// Retries
pub use ideaprobe_retries::{AttemptState, ExponentialBackoff, RetryConfig};

// Models
pub use ideaprobe_models::{
    BlockingModelInvoker, BoxedInvoker, FunctionInvoker, InvocationError, MockInvoker,
    ModelInvoker, OpenAIChatInvoker,
};

// Generation
pub use ideaprobe_generate::{
    generate, generate_blocking, generate_named, generate_output, generate_output_blocking,
    generate_with_state, FailureReason, GenerationError, GenerationResult,
};

// Business validation
pub use analyzer::{AnalyzedPost, Analyzer, AnalyzerConfig, Language};
pub use post::{Comment, Platform, Post};
pub use records::{
    CombinedAnalysis, KeywordSet, PlatformInsight, PostAnalysis, RedditPostAnalysis,
};

// ============================================================================
// Prelude
// ============================================================================

/// Prelude for common imports.
///
/// ```rust
/// use ideaprobe::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        generate, generate_blocking, generate_output, generate_output_blocking, Analyzer,
        AnalyzerConfig, CombinedAnalysis, FailureReason, GenerationError, MockInvoker,
        ModelInvoker, Platform, Post, RetryConfig, Schema, SchemaRegistry, StructuredOutput,
        TypedDocument,
    };
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[tokio::test]
    async fn test_prelude_covers_typed_generation() {
        let model = MockInvoker::new("mock").with_text(r#"{"keywords": ["a", "b"]}"#);

        let set: crate::KeywordSet = generate_output("p", &model, &RetryConfig::no_retry())
            .await
            .unwrap();

        assert_eq!(set.keywords, vec!["a", "b"]);
    }

    #[test]
    fn test_blocking_through_facade() {
        let schema = Schema::builder("Score").integer("score").build().unwrap();
        let model = MockInvoker::new("mock").with_text("score: {\"score\": 4.0}");

        let doc = generate_blocking(&schema, "p", &model, &RetryConfig::no_retry()).unwrap();
        assert_eq!(doc.get("score"), Some(&serde_json::json!(4)));
    }
}
