//! LLM gateway trait and completion types
//!
//! The gateway is an opaque request/response capability. No retry is
//! attempted here or above: a failed generate ends the task.

use crate::error::ProviderError;
use crate::message::Message;
use async_trait::async_trait;

/// Token usage reported by the server
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// A complete (non-streaming) model response
#[derive(Debug, Clone)]
pub struct Completion {
    /// Generated text
    pub content: String,

    /// Model that produced the completion
    pub model: String,

    /// Wall-clock request latency in milliseconds
    pub latency_ms: u64,

    /// Token usage, zeroed when the server does not report it
    pub usage: TokenUsage,
}

/// LLM gateway capability
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Send the message history and get a completion
    async fn generate(
        &self,
        messages: &[Message],
        temperature: f32,
        max_tokens: u32,
    ) -> Result<Completion, ProviderError>;

    /// Quick reachability probe of the model server
    async fn ping(&self) -> bool {
        false
    }
}
