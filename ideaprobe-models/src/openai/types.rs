//! OpenAI Chat Completions wire types.

use serde::{Deserialize, Serialize};

/// Chat completion request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    /// Model to use.
    pub model: String,
    /// Messages in the conversation.
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Maximum tokens to generate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u64>,
}

/// A chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role (system, user, assistant).
    pub role: String,
    /// Text content.
    pub content: String,
}

impl ChatMessage {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Chat completion response.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    /// Model used.
    #[serde(default)]
    pub model: Option<String>,
    /// Response choices.
    pub choices: Vec<ChatChoice>,
}

/// Chat choice.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    /// The message.
    pub message: ResponseMessage,
    /// Reason for stopping.
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Response message.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage {
    /// Text content.
    #[serde(default)]
    pub content: Option<String>,
    /// Refusal (for content filter).
    #[serde(default)]
    pub refusal: Option<String>,
}

/// OpenAI error envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAIError {
    /// Error details.
    pub error: OpenAIErrorBody,
}

/// OpenAI error body.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAIErrorBody {
    /// Error message.
    pub message: String,
    /// Error code.
    #[serde(default)]
    pub code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_skips_unset_options() {
        let request = ChatCompletionRequest {
            model: "gpt-4o-mini".into(),
            messages: vec![ChatMessage::user("hi")],
            temperature: None,
            max_tokens: Some(3000),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "model": "gpt-4o-mini",
                "messages": [{"role": "user", "content": "hi"}],
                "max_tokens": 3000
            })
        );
    }

    #[test]
    fn test_response_tolerates_extra_fields() {
        let resp: ChatCompletionResponse = serde_json::from_value(json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "hello"},
                "finish_reason": "stop"
            }]
        }))
        .unwrap();
        assert_eq!(resp.choices[0].message.content.as_deref(), Some("hello"));
    }

    #[test]
    fn test_error_envelope() {
        let err: OpenAIError = serde_json::from_value(json!({
            "error": {"message": "Invalid API key", "type": "invalid_request_error", "code": "invalid_api_key"}
        }))
        .unwrap();
        assert_eq!(err.error.code.as_deref(), Some("invalid_api_key"));
    }
}
