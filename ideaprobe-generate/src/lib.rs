//! # ideaprobe-generate
//!
//! Schema-guided generation: prompt a model for a document of a declared
//! shape and keep asking until the reply validates.
//!
//! Each attempt:
//!
//! 1. appends a synthesized example of the schema to the prompt
//! 2. invokes the model once
//! 3. extracts JSON objects from the reply
//! 4. validates every extracted object against the schema
//!
//! An attempt succeeds only when at least one object was extracted and all
//! of them validated; the first one is returned. Empty replies, replies
//! without JSON and replies with invalid objects are retried with
//! exponential backoff. Invocation errors end the call immediately.
//!
//! # Example
//!
//! ```rust
//! use ideaprobe_generate::{generate_with_state, FailureReason};
//! use ideaprobe_models::MockInvoker;
//! use ideaprobe_retries::RetryConfig;
//! use ideaprobe_schema::Schema;
//! use std::time::Duration;
//!
//! # tokio_test::block_on(async {
//! let schema = Schema::builder("KeywordSet").string_list("keywords").build()?;
//! let model = MockInvoker::new("mock").with_default_text("Sorry, no JSON today.");
//! let config = RetryConfig::new()
//!     .max_retries(2)
//!     .initial_delay(Duration::from_millis(1));
//!
//! let (result, state) = generate_with_state(&schema, "Suggest keywords", &model, &config).await;
//! let err = result.unwrap_err();
//!
//! assert_eq!(err.reason(), FailureReason::Empty);
//! assert_eq!(state.attempts, 3);
//! assert_eq!(model.calls(), 3);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! # });
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod errors;
pub mod orchestrator;
pub mod output;
pub mod prompt;

// Re-exports
pub use errors::{AttemptFailure, FailureReason, GenerationError, GenerationResult};
pub use orchestrator::{
    generate, generate_blocking, generate_blocking_with_state, generate_named,
    generate_with_state,
};
pub use output::{generate_output, generate_output_blocking};
pub use prompt::{augment_prompt, EXAMPLE_INSTRUCTION};

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{
        generate, generate_blocking, generate_named, generate_output, generate_output_blocking,
        FailureReason, GenerationError, GenerationResult,
    };
}
