//! Generation error types.
//!
//! Transient failures (no text, no JSON, failed validation) are absorbed by
//! the retry loop and only surface once retries are exhausted. Invocation
//! faults and schema authoring mistakes surface immediately.

use ideaprobe_models::InvocationError;
use ideaprobe_output::{BindError, ValidationFailure};
use ideaprobe_retries::Retryable;
use ideaprobe_schema::SchemaError;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Why a generation failed, without the diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// Every attempt produced no text or no JSON.
    Empty,
    /// The last attempt produced JSON that failed validation.
    ValidationFailed,
    /// The model call itself failed.
    Aborted,
    /// The schema or its Rust binding is wrong.
    SchemaAuthoring,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Empty => "empty",
            Self::ValidationFailed => "validation_failed",
            Self::Aborted => "aborted",
            Self::SchemaAuthoring => "schema_authoring",
        };
        f.write_str(s)
    }
}

/// Terminal failure of a generation call.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// No attempt yielded a JSON document.
    #[error("No JSON document in model output after {attempts} attempt(s)")]
    Empty {
        /// Attempts made.
        attempts: u32,
        /// Text of the last reply, if there was any.
        last_raw_text: Option<String>,
    },

    /// The last attempt's documents failed validation.
    #[error(
        "Model output failed validation after {attempts} attempt(s): {}",
        summarize(.errors)
    )]
    ValidationFailed {
        /// Attempts made.
        attempts: u32,
        /// Text of the last reply.
        last_raw_text: String,
        /// Failed documents of the last attempt.
        errors: Vec<ValidationFailure>,
    },

    /// The model invoker failed; never retried.
    #[error("Model invocation failed on attempt {attempt}: {source}")]
    Aborted {
        /// One-based attempt number that failed.
        attempt: u32,
        /// Underlying invocation error.
        #[source]
        source: InvocationError,
    },

    /// The schema could not be resolved or built.
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// A validated document did not fit the requested Rust type.
    #[error(transparent)]
    Binding(#[from] BindError),
}

impl GenerationError {
    /// The terminal reason.
    #[must_use]
    pub fn reason(&self) -> FailureReason {
        match self {
            Self::Empty { .. } => FailureReason::Empty,
            Self::ValidationFailed { .. } => FailureReason::ValidationFailed,
            Self::Aborted { .. } => FailureReason::Aborted,
            Self::Schema(_) | Self::Binding(_) => FailureReason::SchemaAuthoring,
        }
    }

    /// Attempts made before failing, when any were.
    #[must_use]
    pub fn attempts(&self) -> Option<u32> {
        match self {
            Self::Empty { attempts, .. } | Self::ValidationFailed { attempts, .. } => {
                Some(*attempts)
            }
            Self::Aborted { attempt, .. } => Some(*attempt),
            Self::Schema(_) | Self::Binding(_) => None,
        }
    }

    /// Text of the last model reply, when there was one.
    #[must_use]
    pub fn last_raw_text(&self) -> Option<&str> {
        match self {
            Self::Empty { last_raw_text, .. } => last_raw_text.as_deref(),
            Self::ValidationFailed { last_raw_text, .. } => Some(last_raw_text),
            _ => None,
        }
    }

    /// Validation failures of the last attempt.
    #[must_use]
    pub fn validation_errors(&self) -> &[ValidationFailure] {
        match self {
            Self::ValidationFailed { errors, .. } => errors,
            _ => &[],
        }
    }

    /// Whether retrying the whole call later might help.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Empty { .. } | Self::ValidationFailed { .. } => true,
            Self::Aborted { source, .. } => source.is_transient(),
            Self::Schema(_) | Self::Binding(_) => false,
        }
    }

    pub(crate) fn from_failure(failure: AttemptFailure, attempts: u32) -> Self {
        match failure {
            AttemptFailure::Empty { raw } | AttemptFailure::NoJson { raw } => Self::Empty {
                attempts,
                last_raw_text: raw,
            },
            AttemptFailure::Invalid { raw, errors } => Self::ValidationFailed {
                attempts,
                last_raw_text: raw,
                errors,
            },
            AttemptFailure::Aborted(source) => Self::Aborted {
                attempt: attempts,
                source,
            },
        }
    }
}

fn summarize(errors: &[ValidationFailure]) -> String {
    match errors {
        [] => "no diagnostics".to_string(),
        [only] => only.message(),
        [first, rest @ ..] => format!("{} (and {} more document(s))", first.message(), rest.len()),
    }
}

/// Result type for generation.
pub type GenerationResult<T> = Result<T, GenerationError>;

/// Why a single attempt failed.
#[derive(Debug)]
pub enum AttemptFailure {
    /// The model returned no text, or only whitespace.
    Empty {
        /// The reply, if any.
        raw: Option<String>,
    },
    /// The reply held no JSON document.
    NoJson {
        /// The reply.
        raw: Option<String>,
    },
    /// Some extracted documents failed validation.
    Invalid {
        /// The reply.
        raw: String,
        /// The failed documents.
        errors: Vec<ValidationFailure>,
    },
    /// The model call failed.
    Aborted(InvocationError),
}

impl fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { .. } => f.write_str("model returned no text"),
            Self::NoJson { .. } => f.write_str("no JSON document found in reply"),
            Self::Invalid { errors, .. } => {
                write!(f, "validation failed: {}", summarize(errors))
            }
            Self::Aborted(err) => write!(f, "invocation failed: {}", err),
        }
    }
}

impl Retryable for AttemptFailure {
    fn is_retryable(&self) -> bool {
        !matches!(self, Self::Aborted(_))
    }
}
