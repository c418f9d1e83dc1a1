//! OpenAI-compatible chat completions client
//!
//! LM Studio and Ollama both expose `/v1/chat/completions`; this client
//! drives either. Non-streaming only.

use crate::error::ProviderError;
use crate::gateway::{Completion, LlmGateway, TokenUsage};
use crate::message::Message;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Timeout for the `/v1/models` reachability probe
const PING_TIMEOUT_SECS: u64 = 5;

/// Client for an OpenAI-compatible local model server
pub struct OpenAiCompatProvider {
    client: Client,
    base_url: String,
    model: String,
}

impl OpenAiCompatProvider {
    /// Create a new client. `timeout` bounds the whole completion request.
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Unknown(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        })
    }

    fn chat_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    fn models_url(&self) -> String {
        format!("{}/v1/models", self.base_url)
    }

    /// Model name this client requests
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl LlmGateway for OpenAiCompatProvider {
    async fn generate(
        &self,
        messages: &[Message],
        temperature: f32,
        max_tokens: u32,
    ) -> Result<Completion, ProviderError> {
        let request = ChatRequest {
            model: &self.model,
            messages: messages.iter().map(WireMessage::from).collect(),
            temperature,
            max_tokens,
            stream: false,
        };

        let started = Instant::now();
        let response = self
            .client
            .post(self.chat_url())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(e.to_string())
                } else if e.is_connect() {
                    ProviderError::Network(format!(
                        "Connection failed: {}. Make sure the model server is running at {}",
                        e, self.base_url
                    ))
                } else {
                    ProviderError::Network(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::from_http_status(status, &body));
        }

        let api_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        let latency_ms = started.elapsed().as_millis() as u64;
        let choice = api_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::InvalidResponse("Response has no choices".to_string()))?;

        let usage = api_response.usage.unwrap_or_default();
        tracing::debug!(
            latency_ms,
            total_tokens = usage.total_tokens,
            "Completion received"
        );

        Ok(Completion {
            content: choice.message.content,
            model: api_response.model.unwrap_or_else(|| self.model.clone()),
            latency_ms,
            usage: TokenUsage {
                prompt_tokens: usage.prompt_tokens,
                completion_tokens: usage.completion_tokens,
                total_tokens: usage.total_tokens,
            },
        })
    }

    async fn ping(&self) -> bool {
        self.client
            .get(self.models_url())
            .timeout(Duration::from_secs(PING_TIMEOUT_SECS))
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage>,
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireMessage {
    role: String,
    content: String,
}

impl From<&Message> for WireMessage {
    fn from(msg: &Message) -> Self {
        Self {
            role: msg.role.as_str().to_string(),
            content: msg.content.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<WireUsage>,
    #[serde(default)]
    model: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: WireMessage,
}

#[derive(Debug, Default, Deserialize)]
struct WireUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
    #[serde(default)]
    total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::MessageRole;

    fn provider() -> OpenAiCompatProvider {
        OpenAiCompatProvider::new(
            "http://localhost:1234/",
            "local-model",
            Duration::from_secs(120),
        )
        .unwrap()
    }

    #[test]
    fn test_urls_strip_trailing_slash() {
        let p = provider();
        assert_eq!(p.chat_url(), "http://localhost:1234/v1/chat/completions");
        assert_eq!(p.models_url(), "http://localhost:1234/v1/models");
    }

    #[test]
    fn test_wire_message_roles() {
        let wire = WireMessage::from(&Message::system("be helpful"));
        assert_eq!(wire.role, "system");
        let wire = WireMessage::from(&Message {
            role: MessageRole::Assistant,
            content: "hi".to_string(),
        });
        assert_eq!(wire.role, "assistant");
    }

    #[test]
    fn test_response_parsing_without_usage() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"hello"}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.choices[0].message.content, "hello");
        assert!(parsed.usage.is_none());
    }
}
