//! Lead intent scoring and outreach synthesis engine.
//!
//! Converts heterogeneous buying-intent signals into an urgency-ranked
//! composite score, runs an independent conversion-probability model,
//! synthesizes quality-gated outreach rationale through a language model,
//! and drafts outreach messages under deterministic anti-genericness
//! guardrails.
//!
//! Persistence and text generation live behind the [`store::LeadStore`]
//! and [`llm::LanguageModel`] traits; everything else is pure computation.

pub mod error;
pub mod llm;
pub mod outreach;
pub mod scoring;
pub mod slop;
pub mod store;
pub mod synthesis;
pub mod types;
pub mod util;

pub use error::EngineError;
pub use llm::{HttpModelClient, LanguageModel, ModelConfig};
pub use outreach::{MessageGenerator, MessageRequest};
pub use scoring::predictive::{
    calculate_predictive_score, leads_by_action, score_all_leads, top_predicted,
};
pub use scoring::signals::{
    calculate_composite_score, get_signal_urgency, score_leads_signals, score_signal,
};
pub use slop::{analyze_message, score_label};
pub use store::{LeadStore, MemoryLeadStore};
pub use synthesis::{SynthesisEngine, SynthesisOptions, DEFAULT_MIN_OUTREACH_SCORE};
pub use types::{
    Classification, CompositeScoreResult, GeneratedMessage, IntentSignal, Lead, LeadPatch,
    MessageType, PredictiveScore, SlopAnalysis, SynthesizedContext, UrgencyResult,
};
