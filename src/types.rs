//! Core domain types: leads, intent signals, and scoring/synthesis results.
//!
//! Wire-facing structs are camelCase-serialized and tolerant on
//! deserialization (`#[serde(default)]`) so a partially populated lead
//! record never fails to load.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The kind of observation that produced an intent signal.
///
/// Unknown wire values deserialize to `Other` instead of erroring; scoring
/// gives that arm a conservative default weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum SignalType {
    RedditPost,
    G2Review,
    JobPosting,
    News,
    TechChange,
    Other,
}

impl From<String> for SignalType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "reddit_post" => SignalType::RedditPost,
            "g2_review" => SignalType::G2Review,
            "job_posting" => SignalType::JobPosting,
            "news" => SignalType::News,
            "tech_change" => SignalType::TechChange,
            _ => SignalType::Other,
        }
    }
}

impl fmt::Display for SignalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SignalType::RedditPost => "reddit_post",
            SignalType::G2Review => "g2_review",
            SignalType::JobPosting => "job_posting",
            SignalType::News => "news",
            SignalType::TechChange => "tech_change",
            SignalType::Other => "other",
        };
        f.write_str(s)
    }
}

/// How directly a signal relates to the product being sold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum Relevance {
    Direct,
    Adjacent,
    Weak,
    Other,
}

impl From<String> for Relevance {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "direct" => Relevance::Direct,
            "adjacent" => Relevance::Adjacent,
            "weak" => Relevance::Weak,
            _ => Relevance::Other,
        }
    }
}

/// A timestamped, typed observation suggesting a lead may be evaluating
/// solutions. Immutable once created; appended to a lead's signal list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentSignal {
    pub signal_type: SignalType,
    pub signal_date: DateTime<Utc>,
    pub signal_content: String,
    /// Reporter-assigned strength, 1-10.
    pub signal_strength: u8,
    #[serde(default = "default_relevance")]
    pub relevance_to_us: Relevance,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

fn default_relevance() -> Relevance {
    Relevance::Adjacent
}

/// A signal paired with its computed score. Ephemeral; never persisted on
/// its own.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredSignal {
    pub signal: IntentSignal,
    pub score: f64,
}

/// Lead temperature derived from the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Hot,
    Warm,
    Nurture,
}

impl Classification {
    /// Pure monotone mapping from composite score to tier.
    pub fn from_score(score: u8) -> Self {
        if score >= 8 {
            Classification::Hot
        } else if score >= 5 {
            Classification::Warm
        } else {
            Classification::Nurture
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Classification::Hot => "hot",
            Classification::Warm => "warm",
            Classification::Nurture => "nurture",
        };
        f.write_str(s)
    }
}

/// Composite 1-10 intent score with supporting evidence.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositeScoreResult {
    pub score: u8,
    pub classification: Classification,
    /// At most 3 signals, strongest first.
    pub top_signals: Vec<ScoredSignal>,
    pub reasoning: String,
}

/// Operational urgency tier for a lead's signal set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Critical,
    High,
    Medium,
    Low,
}

/// Human-readable urgency guidance. Deadlines are operational wording,
/// not machine timestamps.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrgencyResult {
    pub urgency: Urgency,
    pub action: String,
    pub deadline: String,
}

/// Persisted score fields for one lead out of a batch scoring pass.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadSignalScore {
    pub score: u8,
    pub classification: Classification,
}

/// Which lever a predictive score factor pulls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorCategory {
    Engagement,
    Fit,
    Timing,
    DataQuality,
}

/// One explainable contribution to the predictive score.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreFactor {
    pub name: String,
    /// Signed contribution, -100..=100.
    pub impact: i32,
    pub description: String,
    pub category: FactorCategory,
}

/// How much evidence backs the predictive score (factor density, not the
/// score itself).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

/// Estimated deal size band, keyed off population only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueTier {
    High,
    Medium,
    Low,
}

/// Stateless conversion-probability report. Computed fresh each call and
/// never persisted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictiveScore {
    pub lead_id: String,
    pub predicted_conversion_probability: u8,
    pub confidence_level: Confidence,
    /// Sorted by |impact| descending.
    pub score_factors: Vec<ScoreFactor>,
    pub recommended_action: String,
    pub next_best_action: String,
    pub predicted_value: ValueTier,
}

/// Deterministic text-quality verdict from the slop linter.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlopAnalysis {
    /// 0-100 penalty sum; higher is worse.
    pub score: u8,
    pub issues: Vec<String>,
    pub improvements: Vec<String>,
}

/// Structured outreach rationale generated for a lead from its signals.
///
/// Overwritten wholesale on resynthesis; no history is kept here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesizedContext {
    /// Either a concrete trigger or a "NOT READY: <reason>" sentinel.
    pub why_reach_out_now: String,
    /// At most 3 hooks, each tagged with its source.
    #[serde(default)]
    pub personalization_hooks: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended_angle: Option<String>,
    #[serde(default)]
    pub predicted_objections: Vec<String>,
    #[serde(default)]
    pub counter_to_objections: HashMap<String, String>,
    #[serde(default)]
    pub do_not_mention: Vec<String>,
    /// 1-10 readiness score for outreach.
    pub outreach_score: u8,
    #[serde(default)]
    pub score_reasoning: String,
}

/// Outreach message flavor, with per-type stylistic constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    ColdEmail,
    Linkedin,
    FollowUpEmail,
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MessageType::ColdEmail => "cold_email",
            MessageType::Linkedin => "linkedin",
            MessageType::FollowUpEmail => "follow_up_email",
        };
        f.write_str(s)
    }
}

/// One drafted outreach message plus its quality verdict. The caller
/// decides whether to keep or discard; nothing here is versioned.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub body: String,
    pub slop_score: u8,
    pub slop_issues: Vec<String>,
    pub suggested_improvements: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hook_used: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signal_referenced: Option<String>,
}

/// A known decision maker at the lead organization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionMaker {
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// A prospective sales target. Owned by the lead store; this core reads
/// leads and writes back score/classification/synthesis fields via
/// `LeadPatch`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: String,
    pub company_name: String,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub decision_makers: Vec<DecisionMaker>,
    /// Service population / addressable headcount for the account.
    #[serde(default)]
    pub population: Option<u64>,
    /// 1-10 technology maturity estimate.
    #[serde(default)]
    pub tech_maturity: Option<u8>,
    #[serde(default)]
    pub pain_points: Vec<String>,
    #[serde(default)]
    pub buying_signals: Vec<String>,
    #[serde(default)]
    pub recent_news: Vec<String>,
    #[serde(default)]
    pub competitor_mentions: Vec<String>,
    /// 0-100 completeness score from the enrichment pipeline.
    #[serde(default)]
    pub enrichment_score: Option<f64>,
    #[serde(default)]
    pub last_contact_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_contact_outcome: Option<String>,
    #[serde(default)]
    pub intent_signals: Vec<IntentSignal>,
    // Persisted outputs of this engine.
    #[serde(default)]
    pub score: Option<u8>,
    #[serde(default)]
    pub classification: Option<Classification>,
    #[serde(default)]
    pub outreach_score: Option<u8>,
    #[serde(default)]
    pub synthesized_context: Option<SynthesizedContext>,
    #[serde(default)]
    pub last_signal_date: Option<DateTime<Utc>>,
}

/// Partial write-back for a lead. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct LeadPatch {
    pub score: Option<u8>,
    pub classification: Option<Classification>,
    pub outreach_score: Option<u8>,
    pub synthesized_context: Option<SynthesizedContext>,
    pub last_signal_date: Option<DateTime<Utc>>,
}

impl LeadPatch {
    /// Apply this patch to a lead in place.
    pub fn apply(&self, lead: &mut Lead) {
        if let Some(score) = self.score {
            lead.score = Some(score);
        }
        if let Some(classification) = self.classification {
            lead.classification = Some(classification);
        }
        if let Some(outreach_score) = self.outreach_score {
            lead.outreach_score = Some(outreach_score);
        }
        if let Some(ref ctx) = self.synthesized_context {
            lead.synthesized_context = Some(ctx.clone());
        }
        if let Some(date) = self.last_signal_date {
            lead.last_signal_date = Some(date);
        }
    }
}
