//! HTTP implementation of the language model seam.
//!
//! Speaks a chat-shaped JSON contract: POST `{model, max_tokens, messages}`
//! to a configured endpoint, read text content back. Response parsing is
//! tolerant of the two common wire shapes (`content` block list and
//! `choices[].message`) so the client works against either an
//! Anthropic-style or an OpenAI-style endpoint.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::EngineError;

use super::{ChatRequest, LanguageModel};

/// Tolerant response envelope. All fields optional; extraction picks
/// whichever shape is populated.
#[derive(Debug, Deserialize)]
struct ModelResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Reqwest-backed model client.
pub struct HttpModelClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl HttpModelClient {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }

    /// Concatenate all text content from a parsed response.
    fn extract_text(response: &ModelResponse) -> String {
        let from_blocks: String = response
            .content
            .iter()
            .filter_map(|b| b.text.as_deref())
            .collect();
        if !from_blocks.is_empty() {
            return from_blocks;
        }
        response
            .choices
            .iter()
            .filter_map(|c| c.message.as_ref().and_then(|m| m.content.as_deref()))
            .collect()
    }
}

#[async_trait]
impl LanguageModel for HttpModelClient {
    async fn complete(&self, request: ChatRequest) -> Result<String, EngineError> {
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| EngineError::ModelCall(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EngineError::ModelCall(format!(
                "endpoint returned {}: {}",
                status, body
            )));
        }

        let parsed: ModelResponse = response
            .json()
            .await
            .map_err(|e| EngineError::ResponseParse(e.to_string()))?;

        let text = Self::extract_text(&parsed);
        if text.is_empty() {
            return Err(EngineError::ResponseParse(
                "response contained no text content".to_string(),
            ));
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_content_block_text() {
        let parsed: ModelResponse =
            serde_json::from_str(r#"{"content":[{"type":"text","text":"hello"}]}"#).unwrap();
        assert_eq!(HttpModelClient::extract_text(&parsed), "hello");
    }

    #[test]
    fn extracts_choices_text() {
        let parsed: ModelResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"hi there"}}]}"#,
        )
        .unwrap();
        assert_eq!(HttpModelClient::extract_text(&parsed), "hi there");
    }

    #[test]
    fn empty_envelope_extracts_nothing() {
        let parsed: ModelResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(HttpModelClient::extract_text(&parsed), "");
    }
}
