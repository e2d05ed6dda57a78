//! Language model seam.
//!
//! The engines treat text generation as a best-effort, possibly-slow,
//! possibly-failing black box behind the `LanguageModel` trait. The trait
//! is injected into engine constructors; there is no module-level
//! singleton client.

mod client;

pub use client::HttpModelClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// One chat message in a model request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// A single-shot completion request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub max_tokens: u32,
    pub messages: Vec<ChatMessage>,
}

/// Model selection and token budget shared by the engines.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub model: String,
    pub max_tokens: u32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model: "claude-3-5-sonnet-latest".to_string(),
            max_tokens: 1024,
        }
    }
}

impl ModelConfig {
    /// Build a single-user-message request under this config.
    pub fn request(&self, prompt: impl Into<String>) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            messages: vec![ChatMessage::user(prompt)],
        }
    }
}

/// External text-generation endpoint.
///
/// Implementations own their transport, timeout, and retry policy; the
/// engines issue exactly one call per invocation and never retry.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Run the request to completion and return the full response text.
    async fn complete(&self, request: ChatRequest) -> Result<String, EngineError>;
}
