//! # ideaprobe-models
//!
//! Model invocation collaborators for structured generation.
//!
//! ## Core Concepts
//!
//! - **[`ModelInvoker`]**: Async prompt-in, text-out model call
//! - **[`BlockingModelInvoker`]**: The same contract for synchronous callers
//! - **[`InvocationError`]**: Why a call failed outright
//! - **[`MockInvoker`]** / **[`FunctionInvoker`]**: Scripted test doubles
//! - **[`OpenAIChatInvoker`]**: OpenAI-compatible Chat Completions client
//!
//! Invokers are passed explicitly to the generation orchestrator; there is
//! no process-wide client.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod mock;
pub mod model;
pub mod openai;

// Re-exports
pub use error::InvocationError;
pub use mock::{FunctionInvoker, InvokeFn, MockInvoker, MockReply};
pub use model::{BlockingModelInvoker, BoxedInvoker, InvocationResult, ModelInvoker};
pub use openai::OpenAIChatInvoker;

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{
        BlockingModelInvoker, BoxedInvoker, FunctionInvoker, InvocationError, MockInvoker,
        ModelInvoker, OpenAIChatInvoker,
    };
}
