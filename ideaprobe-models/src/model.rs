//! Model invocation traits.
//!
//! An invoker turns one prompt into one reply. The generation orchestrator
//! treats every call as atomic: retries inside an invoker are its own
//! business, and an invoker error is never retried by the caller.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::InvocationError;

/// Result of a single invocation: `None` when the model produced no text.
pub type InvocationResult = Result<Option<String>, InvocationError>;

/// Async text-in, text-out model call.
#[async_trait]
pub trait ModelInvoker: Send + Sync {
    /// Get the model name.
    fn name(&self) -> &str;

    /// Get the provider (openai, mock, ...).
    fn system(&self) -> &str;

    /// Get the full model identifier.
    fn identifier(&self) -> String {
        format!("{}:{}", self.system(), self.name())
    }

    /// Send `prompt` and return the reply text.
    async fn invoke(&self, prompt: &str) -> InvocationResult;
}

/// Blocking counterpart of [`ModelInvoker`].
pub trait BlockingModelInvoker: Send + Sync {
    /// Send `prompt` and return the reply text, blocking the calling thread.
    fn invoke_blocking(&self, prompt: &str) -> InvocationResult;
}

/// Shared invoker handle.
pub type BoxedInvoker = Arc<dyn ModelInvoker>;

#[async_trait]
impl<T: ModelInvoker + ?Sized> ModelInvoker for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn system(&self) -> &str {
        (**self).system()
    }

    async fn invoke(&self, prompt: &str) -> InvocationResult {
        (**self).invoke(prompt).await
    }
}

impl<T: BlockingModelInvoker + ?Sized> BlockingModelInvoker for Arc<T> {
    fn invoke_blocking(&self, prompt: &str) -> InvocationResult {
        (**self).invoke_blocking(prompt)
    }
}
