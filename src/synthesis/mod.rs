//! Outreach rationale synthesis.
//!
//! Turns a lead's signals into a structured `SynthesizedContext` through a
//! single language model call, guarded by deterministic content rules.
//! Leads with nothing to say are short-circuited to a NOT READY sentinel
//! without spending a model call.

pub mod prompts;

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::EngineError;
use crate::llm::{LanguageModel, ModelConfig};
use crate::slop::find_banned_phrases;
use crate::store::LeadStore;
use crate::types::{Lead, LeadPatch, SynthesizedContext};

use prompts::{build_synthesis_prompt, parse_synthesis_response};

/// Flat pause between batch chunks; a rate-limit courtesy toward the model
/// service, not a token bucket.
const CHUNK_PAUSE_MS: u64 = 500;

/// Default floor for "ready to contact" filtering.
pub const DEFAULT_MIN_OUTREACH_SCORE: u8 = 6;

/// Outreach score assigned to leads with no material to work from.
const NOT_READY_SCORE: u8 = 2;

/// Batch synthesis tuning.
#[derive(Debug, Clone)]
pub struct SynthesisOptions {
    /// Maximum model calls in flight at once.
    pub max_concurrent: usize,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self { max_concurrent: 3 }
    }
}

/// Synthesizes and persists outreach rationale for leads.
#[derive(Clone)]
pub struct SynthesisEngine {
    store: Arc<dyn LeadStore>,
    model: Arc<dyn LanguageModel>,
    config: ModelConfig,
}

impl SynthesisEngine {
    pub fn new(store: Arc<dyn LeadStore>, model: Arc<dyn LanguageModel>) -> Self {
        Self::with_config(store, model, ModelConfig::default())
    }

    pub fn with_config(
        store: Arc<dyn LeadStore>,
        model: Arc<dyn LanguageModel>,
        config: ModelConfig,
    ) -> Self {
        Self {
            store,
            model,
            config,
        }
    }

    /// Synthesize outreach rationale for one lead and persist the result.
    ///
    /// Model and parse failures surface as `Err`; nothing partial is ever
    /// persisted on failure.
    pub async fn synthesize_lead(&self, lead_id: &str) -> Result<SynthesizedContext, EngineError> {
        let lead = self
            .store
            .get_lead(lead_id)
            .await?
            .ok_or_else(|| EngineError::LeadNotFound(lead_id.to_string()))?;

        if !has_synthesis_material(&lead) {
            log::info!("synthesis: {} has no material, returning not-ready", lead_id);
            let sentinel = not_ready_context();
            self.persist(&lead, &sentinel).await?;
            return Ok(sentinel);
        }

        let prompt = build_synthesis_prompt(&lead);
        let response = self
            .model
            .complete(self.config.request(prompt))
            .await
            .inspect_err(|e| log::warn!("synthesis: model call failed for {}: {}", lead_id, e))?;

        let context = parse_synthesis_response(&response)
            .inspect_err(|e| log::warn!("synthesis: parse failed for {}: {}", lead_id, e))?;

        // Post-hoc guardrail: violations are logged, not auto-corrected.
        check_banned_phrases(lead_id, &context);

        self.persist(&lead, &context).await?;
        Ok(context)
    }

    async fn persist(
        &self,
        lead: &Lead,
        context: &SynthesizedContext,
    ) -> Result<(), EngineError> {
        let last_signal_date = lead.intent_signals.iter().map(|s| s.signal_date).max();
        self.store
            .update_lead(
                &lead.id,
                LeadPatch {
                    outreach_score: Some(context.outreach_score),
                    synthesized_context: Some(context.clone()),
                    last_signal_date,
                    ..Default::default()
                },
            )
            .await
    }

    /// Synthesize a batch of leads with capped concurrency.
    ///
    /// Lead ids are processed in chunks of `max_concurrent`; each chunk is
    /// awaited fully before a flat pause and the next chunk. Per-lead
    /// failures are isolated as `None` and never abort the batch.
    pub async fn synthesize_batch(
        &self,
        lead_ids: &[String],
        options: SynthesisOptions,
    ) -> HashMap<String, Option<SynthesizedContext>> {
        let max_concurrent = options.max_concurrent.max(1);
        let mut results = HashMap::with_capacity(lead_ids.len());

        for (i, chunk) in lead_ids.chunks(max_concurrent).enumerate() {
            if i > 0 {
                tokio::time::sleep(std::time::Duration::from_millis(CHUNK_PAUSE_MS)).await;
            }

            let handles: Vec<_> = chunk
                .iter()
                .map(|id| {
                    let engine = self.clone();
                    let id = id.clone();
                    tokio::spawn(async move {
                        let result = engine.synthesize_lead(&id).await;
                        (id, result)
                    })
                })
                .collect();

            for handle in handles {
                match handle.await {
                    Ok((id, Ok(context))) => {
                        results.insert(id, Some(context));
                    }
                    Ok((id, Err(e))) => {
                        log::warn!("synthesis batch: {} failed: {}", id, e);
                        results.insert(id, None);
                    }
                    Err(e) => {
                        log::warn!("synthesis batch: task panicked: {}", e);
                    }
                }
            }
        }

        results
    }

    /// Leads whose persisted outreach score meets the floor, strongest
    /// first. Pure filter and sort over the store.
    pub async fn outreach_ready_leads(&self, min_score: u8) -> Result<Vec<Lead>, EngineError> {
        let mut ready: Vec<Lead> = self
            .store
            .all_leads()
            .await?
            .into_iter()
            .filter(|lead| lead.outreach_score.unwrap_or(0) >= min_score)
            .collect();
        ready.sort_by_key(|lead| std::cmp::Reverse(lead.outreach_score.unwrap_or(0)));
        Ok(ready)
    }
}

/// A lead is worth a model call only if it has something to say.
fn has_synthesis_material(lead: &Lead) -> bool {
    !lead.intent_signals.is_empty()
        || !lead.recent_news.is_empty()
        || !lead.buying_signals.is_empty()
}

fn not_ready_context() -> SynthesizedContext {
    SynthesizedContext {
        why_reach_out_now:
            "NOT READY: No intent signals detected. Gather signals before reaching out."
                .to_string(),
        personalization_hooks: Vec::new(),
        recommended_angle: None,
        predicted_objections: Vec::new(),
        counter_to_objections: HashMap::new(),
        do_not_mention: Vec::new(),
        outreach_score: NOT_READY_SCORE,
        score_reasoning: "No actionable trigger in the available data".to_string(),
    }
}

fn check_banned_phrases(lead_id: &str, context: &SynthesizedContext) {
    let mut text = context.why_reach_out_now.clone();
    for hook in &context.personalization_hooks {
        text.push('\n');
        text.push_str(hook);
    }
    if let Some(ref angle) = context.recommended_angle {
        text.push('\n');
        text.push_str(angle);
    }
    let hits = find_banned_phrases(&text);
    if !hits.is_empty() {
        log::warn!(
            "synthesis: {} contains banned phrases: {}",
            lead_id,
            hits.join(", ")
        );
    }
}
