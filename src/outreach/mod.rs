//! Outreach message drafting.
//!
//! One model call per draft; the reply is parsed leniently and the body is
//! always run through the slop linter before being returned. Regeneration
//! is the same path with user feedback appended to the prompt - no diffing
//! or memory of the prior draft.

pub mod prompts;

use std::sync::Arc;

use crate::error::EngineError;
use crate::llm::{LanguageModel, ModelConfig};
use crate::slop::analyze_message;
use crate::types::GeneratedMessage;

pub use prompts::MessageRequest;

use prompts::{build_message_prompt, parse_message_response};

/// Drafts and regenerates outreach messages under stylistic constraints.
#[derive(Clone)]
pub struct MessageGenerator {
    model: Arc<dyn LanguageModel>,
    config: ModelConfig,
}

impl MessageGenerator {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self::with_config(model, ModelConfig::default())
    }

    pub fn with_config(model: Arc<dyn LanguageModel>, config: ModelConfig) -> Self {
        Self { model, config }
    }

    /// Draft a message for the request.
    ///
    /// Fails only on an outright model call failure; a malformed reply
    /// degrades to a raw-text body instead of erroring.
    pub async fn generate_message(
        &self,
        request: &MessageRequest,
    ) -> Result<GeneratedMessage, EngineError> {
        self.draft(request, None).await
    }

    /// Redraft with the user's free-text feedback on the previous version.
    pub async fn regenerate_message(
        &self,
        request: &MessageRequest,
        feedback: &str,
    ) -> Result<GeneratedMessage, EngineError> {
        self.draft(request, Some(feedback)).await
    }

    async fn draft(
        &self,
        request: &MessageRequest,
        feedback: Option<&str>,
    ) -> Result<GeneratedMessage, EngineError> {
        let prompt = build_message_prompt(request, feedback);
        let response = self
            .model
            .complete(self.config.request(prompt))
            .await
            .inspect_err(|e| {
                log::warn!(
                    "message: {} generation failed for {}: {}",
                    request.message_type,
                    request.lead.id,
                    e
                )
            })?;

        let parsed = parse_message_response(&response);
        let verdict = analyze_message(&parsed.body);
        log::debug!(
            "message: drafted {} for {} (slop {})",
            request.message_type,
            request.lead.id,
            verdict.score
        );

        Ok(GeneratedMessage {
            subject: parsed.subject,
            body: parsed.body,
            slop_score: verdict.score,
            slop_issues: verdict.issues,
            suggested_improvements: verdict.improvements,
            hook_used: parsed.hook_used,
            signal_referenced: parsed.signal_referenced,
        })
    }
}
