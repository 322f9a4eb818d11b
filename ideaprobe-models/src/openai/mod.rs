//! OpenAI-compatible Chat Completions invoker.
//!
//! ## Example
//!
//! ```rust,ignore
//! use ideaprobe_models::openai::OpenAIChatInvoker;
//! use ideaprobe_models::ModelInvoker;
//!
//! let model = OpenAIChatInvoker::from_env()?.with_temperature(0.2);
//! let reply = model.invoke("Name three coffee delivery apps").await?;
//! ```

pub mod chat;
pub mod types;

// Re-exports
pub use chat::{
    OpenAIChatInvoker, DEFAULT_BASE_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, OPENAI_API_KEY_ENV,
    OPENAI_BASE_URL_ENV, OPENAI_MODEL_ENV,
};
pub use types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
