//! Error types for the scoring and synthesis engines.
//!
//! Errors are classified by recoverability:
//! - Retryable: model call failures (network, timeout, rate limit)
//! - NonRetryable: missing leads, store failures, unparseable responses
//!
//! The pure scoring functions never fail; only operations that touch the
//! lead store or the language model return these.

use thiserror::Error;

/// Error type for engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Lead not found: {0}")]
    LeadNotFound(String),

    #[error("Lead store error: {0}")]
    Store(String),

    #[error("Model call failed: {0}")]
    ModelCall(String),

    #[error("No JSON object found in model response")]
    NoJsonInResponse,

    #[error("Failed to parse model response: {0}")]
    ResponseParse(String),
}

impl EngineError {
    /// Returns true if retrying the same call may succeed.
    ///
    /// The engines never retry on their own; callers use this to decide.
    pub fn is_retryable(&self) -> bool {
        matches!(self, EngineError::ModelCall(_))
    }
}
