//! Mock and function-based invokers for testing.
//!
//! - [`MockInvoker`]: replays a scripted queue of replies
//! - [`FunctionInvoker`]: computes each reply with a closure
//!
//! Both implement [`ModelInvoker`] and [`BlockingModelInvoker`].
//!
//! # Example
//!
//! ```rust
//! use ideaprobe_models::{BlockingModelInvoker, MockInvoker};
//!
//! let model = MockInvoker::new("test")
//!     .with_empty()
//!     .with_text(r#"{"keywords": ["a"]}"#);
//!
//! assert_eq!(model.invoke_blocking("first")?, None);
//! assert_eq!(model.invoke_blocking("second")?.as_deref(), Some(r#"{"keywords": ["a"]}"#));
//! assert_eq!(model.prompts(), vec!["first", "second"]);
//! # Ok::<(), ideaprobe_models::InvocationError>(())
//! ```

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::error::InvocationError;
use crate::model::{BlockingModelInvoker, InvocationResult, ModelInvoker};

/// One scripted reply.
#[derive(Debug)]
pub enum MockReply {
    /// Return this text.
    Text(String),
    /// Return no text.
    Empty,
    /// Fail the call.
    Failure(InvocationError),
}

impl MockReply {
    fn into_result(self) -> InvocationResult {
        match self {
            Self::Text(text) => Ok(Some(text)),
            Self::Empty => Ok(None),
            Self::Failure(err) => Err(err),
        }
    }
}

/// An invoker that replays scripted replies in order.
///
/// Once the queue is drained every call returns the default text, or no
/// text if none was set. Clones share the queue and the prompt log.
///
/// # Example
///
/// ```rust
/// use ideaprobe_models::{MockInvoker, ModelInvoker};
///
/// # tokio_test::block_on(async {
/// let model = MockInvoker::new("mock").with_empty().with_text("{\"ok\": true}");
///
/// assert_eq!(model.invoke("first").await.unwrap(), None);
/// assert_eq!(model.invoke("second").await.unwrap().as_deref(), Some("{\"ok\": true}"));
/// assert_eq!(model.invoke("third").await.unwrap(), None);
/// assert_eq!(model.prompts(), vec!["first", "second", "third"]);
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct MockInvoker {
    name: String,
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    default_text: Option<String>,
    prompts: Arc<Mutex<Vec<String>>>,
    latency: Option<Duration>,
}

impl MockInvoker {
    /// Create a new mock invoker.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            replies: Arc::new(Mutex::new(VecDeque::new())),
            default_text: None,
            prompts: Arc::new(Mutex::new(Vec::new())),
            latency: None,
        }
    }

    /// Queue a reply.
    #[must_use]
    pub fn with_reply(self, reply: MockReply) -> Self {
        self.replies.lock().push_back(reply);
        self
    }

    /// Queue a text reply.
    #[must_use]
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_reply(MockReply::Text(text.into()))
    }

    /// Queue a reply with no text.
    #[must_use]
    pub fn with_empty(self) -> Self {
        self.with_reply(MockReply::Empty)
    }

    /// Queue a failed call.
    #[must_use]
    pub fn with_failure(self, error: InvocationError) -> Self {
        self.with_reply(MockReply::Failure(error))
    }

    /// Text to return once the queue is drained.
    #[must_use]
    pub fn with_default_text(mut self, text: impl Into<String>) -> Self {
        self.default_text = Some(text.into());
        self
    }

    /// Simulate a slow endpoint.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Every prompt received so far, in order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }

    /// Number of calls so far.
    pub fn calls(&self) -> usize {
        self.prompts.lock().len()
    }

    /// Scripted replies not yet consumed.
    pub fn remaining(&self) -> usize {
        self.replies.lock().len()
    }

    fn next_reply(&self, prompt: &str) -> InvocationResult {
        self.prompts.lock().push(prompt.to_string());

        match self.replies.lock().pop_front() {
            Some(reply) => reply.into_result(),
            None => Ok(self.default_text.clone()),
        }
    }
}

#[async_trait]
impl ModelInvoker for MockInvoker {
    fn name(&self) -> &str {
        &self.name
    }

    fn system(&self) -> &str {
        "mock"
    }

    async fn invoke(&self, prompt: &str) -> InvocationResult {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        self.next_reply(prompt)
    }
}

impl BlockingModelInvoker for MockInvoker {
    fn invoke_blocking(&self, prompt: &str) -> InvocationResult {
        if let Some(latency) = self.latency {
            std::thread::sleep(latency);
        }
        self.next_reply(prompt)
    }
}

/// Type alias for function invoker callback.
///
/// Receives the prompt and the zero-based call index.
pub type InvokeFn = dyn Fn(&str, u32) -> InvocationResult + Send + Sync;

/// An invoker controlled by a local function.
#[derive(Clone)]
pub struct FunctionInvoker {
    name: String,
    function: Arc<InvokeFn>,
    calls: Arc<AtomicU32>,
}

impl fmt::Debug for FunctionInvoker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionInvoker")
            .field("name", &self.name)
            .field("calls", &self.calls.load(Ordering::SeqCst))
            .finish()
    }
}

impl FunctionInvoker {
    /// Create a new function invoker.
    pub fn new<F>(function: F) -> Self
    where
        F: Fn(&str, u32) -> InvocationResult + Send + Sync + 'static,
    {
        Self {
            name: "function".to_string(),
            function: Arc::new(function),
            calls: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Set a custom name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Number of calls so far.
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    fn call(&self, prompt: &str) -> InvocationResult {
        let index = self.calls.fetch_add(1, Ordering::SeqCst);
        (self.function)(prompt, index)
    }
}

#[async_trait]
impl ModelInvoker for FunctionInvoker {
    fn name(&self) -> &str {
        &self.name
    }

    fn system(&self) -> &str {
        "function"
    }

    async fn invoke(&self, prompt: &str) -> InvocationResult {
        self.call(prompt)
    }
}

impl BlockingModelInvoker for FunctionInvoker {
    fn invoke_blocking(&self, prompt: &str) -> InvocationResult {
        self.call(prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_mock_replays_in_order() {
        let model = MockInvoker::new("test")
            .with_text("one")
            .with_empty()
            .with_failure(InvocationError::auth("bad key"));

        assert_eq!(model.invoke("a").await.unwrap().as_deref(), Some("one"));
        assert_eq!(model.invoke("b").await.unwrap(), None);
        assert!(matches!(
            model.invoke("c").await,
            Err(InvocationError::Authentication(_))
        ));
        assert_eq!(model.prompts(), vec!["a", "b", "c"]);
        assert_eq!(model.remaining(), 0);
    }

    #[tokio::test]
    async fn test_mock_default_after_drain() {
        let model = MockInvoker::new("test").with_default_text("fallback");
        assert_eq!(model.invoke("x").await.unwrap().as_deref(), Some("fallback"));
        assert_eq!(model.invoke("y").await.unwrap().as_deref(), Some("fallback"));

        let silent = MockInvoker::new("silent");
        assert_eq!(silent.invoke("x").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_mock_clones_share_state() {
        let model = MockInvoker::new("test").with_text("once");
        let clone = model.clone();
        assert_eq!(clone.invoke("p").await.unwrap().as_deref(), Some("once"));
        assert_eq!(model.calls(), 1);
        assert_eq!(model.remaining(), 0);
    }

    #[test]
    fn test_mock_blocking() {
        let model = MockInvoker::new("test").with_text("hi");
        assert_eq!(model.invoke_blocking("p").unwrap().as_deref(), Some("hi"));
        assert_eq!(model.identifier(), "mock:test");
    }

    #[tokio::test(start_paused = true)]
    async fn test_mock_latency() {
        let model = MockInvoker::new("slow")
            .with_latency(Duration::from_secs(5))
            .with_text("done");
        let start = tokio::time::Instant::now();
        model.invoke("p").await.unwrap();
        assert!(start.elapsed() >= Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_function_invoker_sees_call_index() {
        let model = FunctionInvoker::new(|prompt, call| {
            Ok(Some(format!("{}#{}", prompt, call)))
        })
        .with_name("echo");

        assert_eq!(model.invoke("a").await.unwrap().as_deref(), Some("a#0"));
        assert_eq!(model.invoke_blocking("b").unwrap().as_deref(), Some("b#1"));
        assert_eq!(model.calls(), 2);
        assert_eq!(model.name(), "echo");
    }
}
