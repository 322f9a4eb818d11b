//! The generation loop.
//!
//! Each attempt augments the prompt with a synthesized example, invokes the
//! model once, extracts JSON from the reply and validates it. Empty replies,
//! replies without JSON and replies with any invalid document are retried
//! with exponential backoff; an invocation error ends the call at once.
//!
//! Attempts within one call are strictly sequential. Nothing is shared
//! between calls except the read-only schema, so independent calls can run
//! concurrently.

use ideaprobe_models::{BlockingModelInvoker, InvocationResult, ModelInvoker};
use ideaprobe_output::{extract, validate_documents, TypedDocument};
use ideaprobe_retries::{with_retry_state, with_retry_state_blocking, AttemptState, RetryConfig};
use ideaprobe_schema::{Schema, SchemaRegistry};
use tracing::{debug, info, warn};

use crate::errors::{AttemptFailure, GenerationError, GenerationResult};
use crate::prompt::augment_prompt;

/// Generate a document matching `schema`.
///
/// # Errors
///
/// Returns [`GenerationError`] once retries are exhausted or on the first
/// invocation error.
///
/// # Example
///
/// ```rust
/// use ideaprobe_generate::generate;
/// use ideaprobe_models::MockInvoker;
/// use ideaprobe_retries::RetryConfig;
/// use ideaprobe_schema::Schema;
///
/// # tokio_test::block_on(async {
/// let schema = Schema::builder("KeywordSet").string_list("keywords").build()?;
/// let model = MockInvoker::new("mock").with_text("```json\n{\"keywords\": [\"a\", \"b\"]}\n```");
///
/// let document = generate(&schema, "Suggest keywords", &model, &RetryConfig::default()).await?;
/// assert_eq!(document.get("keywords").unwrap()[1], "b");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// # });
/// ```
pub async fn generate(
    schema: &Schema,
    prompt: &str,
    invoker: &dyn ModelInvoker,
    config: &RetryConfig,
) -> GenerationResult<TypedDocument> {
    generate_with_state(schema, prompt, invoker, config).await.0
}

/// Like [`generate`], also returning the attempt history.
pub async fn generate_with_state(
    schema: &Schema,
    prompt: &str,
    invoker: &dyn ModelInvoker,
    config: &RetryConfig,
) -> (GenerationResult<TypedDocument>, AttemptState) {
    debug!(
        schema = schema.name(),
        model = %invoker.identifier(),
        max_attempts = config.max_attempts(),
        "Starting generation"
    );

    let (result, state) = with_retry_state(config, move |attempt| async move {
        let augmented = augment_prompt(prompt, schema);
        debug!(schema = schema.name(), attempt, "Invoking model");
        evaluate(schema, invoker.invoke(&augmented).await)
    })
    .await;

    (finish(schema, result, &state), state)
}

/// Blocking variant of [`generate`]; backoff sleeps block the calling
/// thread.
///
/// # Errors
///
/// Returns [`GenerationError`] once retries are exhausted or on the first
/// invocation error.
pub fn generate_blocking(
    schema: &Schema,
    prompt: &str,
    invoker: &dyn BlockingModelInvoker,
    config: &RetryConfig,
) -> GenerationResult<TypedDocument> {
    generate_blocking_with_state(schema, prompt, invoker, config).0
}

/// Like [`generate_blocking`], also returning the attempt history.
pub fn generate_blocking_with_state(
    schema: &Schema,
    prompt: &str,
    invoker: &dyn BlockingModelInvoker,
    config: &RetryConfig,
) -> (GenerationResult<TypedDocument>, AttemptState) {
    debug!(
        schema = schema.name(),
        max_attempts = config.max_attempts(),
        "Starting blocking generation"
    );

    let (result, state) = with_retry_state_blocking(config, |attempt| {
        let augmented = augment_prompt(prompt, schema);
        debug!(schema = schema.name(), attempt, "Invoking model");
        evaluate(schema, invoker.invoke_blocking(&augmented))
    });

    (finish(schema, result, &state), state)
}

/// Resolve `name` in `registry`, then [`generate`].
///
/// # Errors
///
/// Returns [`GenerationError::Schema`] without invoking the model if the
/// name is not registered.
pub async fn generate_named(
    registry: &SchemaRegistry,
    name: &str,
    prompt: &str,
    invoker: &dyn ModelInvoker,
    config: &RetryConfig,
) -> GenerationResult<TypedDocument> {
    let schema = registry.resolve(name)?;
    generate(&schema, prompt, invoker, config).await
}

/// Turn one reply into a validated document or an attempt failure.
fn evaluate(schema: &Schema, reply: InvocationResult) -> Result<TypedDocument, AttemptFailure> {
    let text = match reply.map_err(AttemptFailure::Aborted)? {
        Some(text) if !text.trim().is_empty() => text,
        raw => return Err(AttemptFailure::Empty { raw }),
    };

    let documents = match extract(&text) {
        Some(documents) if !documents.is_empty() => documents,
        _ => return Err(AttemptFailure::NoJson { raw: Some(text) }),
    };

    let outcome = validate_documents(schema, &documents);
    if !outcome.errors.is_empty() {
        debug!(
            schema = schema.name(),
            validated = outcome.validated.len(),
            failed = outcome.errors.len(),
            "Extracted documents failed validation"
        );
        return Err(AttemptFailure::Invalid {
            raw: text,
            errors: outcome.errors,
        });
    }

    if outcome.validated.len() > 1 {
        debug!(
            schema = schema.name(),
            discarded = outcome.validated.len() - 1,
            "Multiple documents validated, keeping the first"
        );
    }

    // Every extracted document validated and there was at least one.
    outcome
        .into_first()
        .ok_or_else(|| AttemptFailure::NoJson { raw: Some(text) })
}

fn finish(
    schema: &Schema,
    result: Result<TypedDocument, AttemptFailure>,
    state: &AttemptState,
) -> GenerationResult<TypedDocument> {
    match result {
        Ok(document) => {
            info!(
                schema = schema.name(),
                attempts = state.attempts,
                waited_ms = state.total_wait.as_millis() as u64,
                "Generation succeeded"
            );
            Ok(document)
        }
        Err(failure) => {
            let err = GenerationError::from_failure(failure, state.attempts);
            warn!(
                schema = schema.name(),
                attempts = state.attempts,
                reason = %err.reason(),
                error = %err,
                "Generation failed"
            );
            Err(err)
        }
    }
}
