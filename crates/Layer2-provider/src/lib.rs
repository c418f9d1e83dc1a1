//! # ember-provider
//!
//! LLM gateway abstraction for EmberCode.
//!
//! The orchestrator only needs one opaque capability: send a message
//! history, get a completion back. Both supported local servers (LM Studio
//! and Ollama) speak the same OpenAI-compatible chat endpoint, so a single
//! client implementation covers them.

pub mod error;
pub mod gateway;
pub mod message;
pub mod providers;

pub use error::ProviderError;
pub use gateway::{Completion, LlmGateway, TokenUsage};
pub use message::{Message, MessageRole};
pub use providers::openai_compat::OpenAiCompatProvider;
pub use providers::create_gateway;
