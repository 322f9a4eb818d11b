//! OpenAI Chat Completions invoker.

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use super::types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage, OpenAIError};
use crate::error::InvocationError;
use crate::model::{InvocationResult, ModelInvoker};

/// Default API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
/// Default model.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
/// Default completion budget.
pub const DEFAULT_MAX_TOKENS: u64 = 3000;

/// Environment variable holding the API key.
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";
/// Environment variable overriding the endpoint.
pub const OPENAI_BASE_URL_ENV: &str = "OPENAI_BASE_URL";
/// Environment variable overriding the model.
pub const OPENAI_MODEL_ENV: &str = "OPENAI_MODEL";

/// Sends one user prompt to an OpenAI-compatible Chat Completions endpoint.
#[derive(Debug, Clone)]
pub struct OpenAIChatInvoker {
    model_name: String,
    client: Client,
    api_key: String,
    base_url: String,
    system_prompt: Option<String>,
    temperature: Option<f64>,
    max_tokens: Option<u64>,
    timeout: Duration,
}

impl OpenAIChatInvoker {
    /// Create a new invoker.
    pub fn new(model_name: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            model_name: model_name.into(),
            client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            system_prompt: None,
            temperature: None,
            max_tokens: Some(DEFAULT_MAX_TOKENS),
            timeout: Duration::from_secs(120),
        }
    }

    /// Create from `OPENAI_API_KEY`, `OPENAI_BASE_URL` and `OPENAI_MODEL`.
    ///
    /// # Errors
    ///
    /// Returns [`InvocationError::Configuration`] if the API key is not set.
    pub fn from_env() -> Result<Self, InvocationError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Like [`from_env`](Self::from_env), reading variables through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`InvocationError::Configuration`] if the API key is not set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, InvocationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(OPENAI_API_KEY_ENV)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                InvocationError::configuration(format!(
                    "{} environment variable not set",
                    OPENAI_API_KEY_ENV
                ))
            })?;
        let model = lookup(OPENAI_MODEL_ENV).unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let mut invoker = Self::new(model, api_key);
        if let Some(url) = lookup(OPENAI_BASE_URL_ENV) {
            invoker = invoker.with_base_url(url);
        }
        Ok(invoker)
    }

    /// Set the base URL.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Prepend a system message to every call.
    #[must_use]
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Set the sampling temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the completion budget; `None` leaves it to the server.
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: Option<u64>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set a custom HTTP client.
    #[must_use]
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The endpoint requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_request(&self, prompt: &str) -> ChatCompletionRequest {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &self.system_prompt {
            messages.push(ChatMessage::system(system.clone()));
        }
        messages.push(ChatMessage::user(prompt));

        ChatCompletionRequest {
            model: self.model_name.clone(),
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }

    fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
        headers
            .get("retry-after")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<u64>().ok())
            .map(Duration::from_secs)
    }

    /// Handle API error response.
    fn handle_error_response(status: u16, body: &str, headers: &HeaderMap) -> InvocationError {
        if status == 429 {
            return InvocationError::rate_limited(Self::parse_retry_after(headers));
        }

        if let Ok(err) = serde_json::from_str::<OpenAIError>(body) {
            if status == 401 {
                return InvocationError::auth(err.error.message);
            }
            return InvocationError::Api {
                message: err.error.message,
                code: err.error.code,
            };
        }

        InvocationError::http(status, body)
    }

    fn parse_response(resp: ChatCompletionResponse) -> InvocationResult {
        let choice = resp
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| InvocationError::invalid_response("No choices in response"))?;

        if let Some(refusal) = &choice.message.refusal {
            debug!(refusal = %refusal, "Model refused the prompt");
        }

        Ok(choice.message.content)
    }
}

#[async_trait]
impl ModelInvoker for OpenAIChatInvoker {
    fn name(&self) -> &str {
        &self.model_name
    }

    fn system(&self) -> &str {
        "openai"
    }

    async fn invoke(&self, prompt: &str) -> InvocationResult {
        if prompt.trim().is_empty() {
            return Err(InvocationError::invalid_prompt("prompt must not be empty"));
        }

        let body = self.build_request(prompt);

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| InvocationError::from_reqwest(e, self.timeout))?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let headers = response.headers().clone();
            let body = response.text().await.unwrap_or_default();
            return Err(Self::handle_error_response(status, &body, &headers));
        }

        let resp: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| InvocationError::invalid_response(e.to_string()))?;

        Self::parse_response(resp)
    }
}
