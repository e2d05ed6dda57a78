//! Synthesis prompt construction and response parsing.
//!
//! The prompt demands strict JSON; parsing is tolerant of markdown fences
//! and surrounding prose but fails hard when no JSON object can be found
//! at all. No partial result ever escapes a parse failure.

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::EngineError;
use crate::types::{IntentSignal, Lead, SynthesizedContext};
use crate::util::wrap_user_data;

/// Hooks kept per synthesis, regardless of how many the model returns.
pub(crate) const MAX_HOOKS: usize = 3;

/// Build the structured synthesis prompt for a lead.
pub fn build_synthesis_prompt(lead: &Lead) -> String {
    let mut prompt = String::new();

    prompt.push_str(
        "You are preparing outreach rationale for a B2B sales rep. \
         Work only from the lead data below.\n\n",
    );

    // Facts block
    let mut facts = vec![format!("Company: {}", lead.company_name)];
    if let Some(ref industry) = lead.industry {
        facts.push(format!("Industry: {}", industry));
    }
    if let Some(population) = lead.population {
        facts.push(format!("Population served: {}", population));
    }
    if let Some(maturity) = lead.tech_maturity {
        facts.push(format!("Tech maturity: {}/10", maturity));
    }
    for dm in &lead.decision_makers {
        match &dm.title {
            Some(title) => facts.push(format!("Decision maker: {} ({})", dm.name, title)),
            None => facts.push(format!("Decision maker: {}", dm.name)),
        }
    }
    prompt.push_str("LEAD FACTS:\n");
    prompt.push_str(&facts.join("\n"));
    prompt.push_str("\n\n");

    if !lead.pain_points.is_empty() {
        prompt.push_str("PAIN POINTS:\n");
        prompt.push_str(&wrap_user_data(&lead.pain_points.join("\n")));
        prompt.push_str("\n\n");
    }
    if !lead.buying_signals.is_empty() {
        prompt.push_str("BUYING SIGNALS:\n");
        prompt.push_str(&wrap_user_data(&lead.buying_signals.join("\n")));
        prompt.push_str("\n\n");
    }
    if !lead.recent_news.is_empty() {
        prompt.push_str("RECENT NEWS:\n");
        prompt.push_str(&wrap_user_data(&lead.recent_news.join("\n")));
        prompt.push_str("\n\n");
    }
    if !lead.intent_signals.is_empty() {
        prompt.push_str("INTENT SIGNALS (most recent first):\n");
        let mut signals: Vec<&IntentSignal> = lead.intent_signals.iter().collect();
        signals.sort_by(|a, b| b.signal_date.cmp(&a.signal_date));
        let lines: Vec<String> = signals
            .iter()
            .map(|s| {
                format!(
                    "[{} | {} | strength {}] {}",
                    s.signal_date.format("%Y-%m-%d"),
                    s.signal_type,
                    s.signal_strength,
                    s.signal_content
                )
            })
            .collect();
        prompt.push_str(&wrap_user_data(&lines.join("\n")));
        prompt.push_str("\n\n");
    }

    prompt.push_str(
        "CONTENT RULES:\n\
         - No generic sales clichés (no \"hope this finds you well\", \"circle back\", \
           \"synergy\", \"touching base\", or anything of that register).\n\
         - whyReachOutNow must open by citing a specific signal, news item, or pain point.\n\
         - If no genuine trigger exists in the data, set whyReachOutNow to \
           \"NOT READY: <reason>\" and score accordingly.\n\
         - Never invent facts not present in the data above.\n\n",
    );

    prompt.push_str(
        "Return ONLY a JSON object - no other text before or after.\n\
         The JSON must conform exactly to this schema:\n\n\
         ```json\n\
         {\n\
           \"whyReachOutNow\": \"1-2 sentences citing the concrete trigger\",\n\
           \"personalizationHooks\": [\"up to 3 hooks, each ending with (Source: ...)\"],\n\
           \"recommendedAngle\": \"the single strongest framing for the first touch\",\n\
           \"predictedObjections\": [\"likely pushback\"],\n\
           \"counterToObjections\": {\"objection\": \"counter\"},\n\
           \"doNotMention\": [\"topics that would hurt credibility or trust\"],\n\
           \"outreachScore\": 7,\n\
           \"scoreReasoning\": \"one sentence on why this score\"\n\
         }\n\
         ```\n",
    );

    prompt
}

/// Intermediate schema for the model's JSON reply. Everything defaulted so
/// a sparse but valid object still parses.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesisResponse {
    #[serde(default)]
    why_reach_out_now: Option<String>,
    #[serde(default)]
    personalization_hooks: Vec<String>,
    #[serde(default)]
    recommended_angle: Option<String>,
    #[serde(default)]
    predicted_objections: Vec<String>,
    #[serde(default)]
    counter_to_objections: HashMap<String, String>,
    #[serde(default)]
    do_not_mention: Vec<String>,
    #[serde(default)]
    outreach_score: Option<i64>,
    #[serde(default)]
    score_reasoning: Option<String>,
}

/// Extract a JSON object from response text.
/// Handles markdown fences, raw objects, and JSON embedded in prose.
pub(crate) fn extract_json(response: &str) -> Option<&str> {
    // ```json fence
    if let Some(start) = response.find("```json") {
        let json_start = start + 7;
        if let Some(end) = response[json_start..].find("```") {
            return Some(response[json_start..json_start + end].trim());
        }
    }
    // Generic ``` fence
    if let Some(start) = response.find("```") {
        let after_fence = start + 3;
        if let Some(nl) = response[after_fence..].find('\n') {
            let json_start = after_fence + nl + 1;
            if let Some(end) = response[json_start..].find("```") {
                let candidate = response[json_start..json_start + end].trim();
                if candidate.starts_with('{') {
                    return Some(candidate);
                }
            }
        }
    }

    let trimmed = response.trim();
    if trimmed.starts_with('{') {
        return Some(trimmed);
    }

    // JSON embedded in surrounding text: match braces, skipping strings.
    if let Some(start) = response.find('{') {
        let candidate = &response[start..];
        let mut depth = 0i32;
        let mut in_string = false;
        let mut escape = false;
        for (i, ch) in candidate.char_indices() {
            if escape {
                escape = false;
                continue;
            }
            if ch == '\\' && in_string {
                escape = true;
                continue;
            }
            if ch == '"' {
                in_string = !in_string;
                continue;
            }
            if in_string {
                continue;
            }
            if ch == '{' {
                depth += 1;
            } else if ch == '}' {
                depth -= 1;
                if depth == 0 {
                    return Some(&candidate[..=i]);
                }
            }
        }
    }
    None
}

/// Parse the model's reply into a `SynthesizedContext`.
///
/// Fails with `NoJsonInResponse` when no object is found, and
/// `ResponseParse` when the object does not match the schema.
pub fn parse_synthesis_response(response: &str) -> Result<SynthesizedContext, EngineError> {
    let json = extract_json(response).ok_or(EngineError::NoJsonInResponse)?;
    let parsed: SynthesisResponse =
        serde_json::from_str(json).map_err(|e| EngineError::ResponseParse(e.to_string()))?;

    let mut hooks = parsed.personalization_hooks;
    hooks.truncate(MAX_HOOKS);

    let outreach_score = parsed.outreach_score.unwrap_or(1).clamp(1, 10) as u8;

    Ok(SynthesizedContext {
        why_reach_out_now: parsed
            .why_reach_out_now
            .unwrap_or_else(|| "NOT READY: Model gave no rationale".to_string()),
        personalization_hooks: hooks,
        recommended_angle: parsed.recommended_angle,
        predicted_objections: parsed.predicted_objections,
        counter_to_objections: parsed.counter_to_objections,
        do_not_mention: parsed.do_not_mention,
        outreach_score,
        score_reasoning: parsed.score_reasoning.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Relevance, SignalType};
    use chrono::Utc;

    fn lead_with_signal() -> Lead {
        Lead {
            id: "l1".to_string(),
            company_name: "Harbor Water District".to_string(),
            industry: Some("Utilities".to_string()),
            pain_points: vec!["paper-based work orders".to_string()],
            intent_signals: vec![IntentSignal {
                signal_type: SignalType::JobPosting,
                signal_date: Utc::now(),
                signal_content: "Hiring a digital transformation lead".to_string(),
                signal_strength: 7,
                relevance_to_us: Relevance::Adjacent,
                source_url: None,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn prompt_carries_lead_facts_and_rules() {
        let prompt = build_synthesis_prompt(&lead_with_signal());
        assert!(prompt.contains("Harbor Water District"));
        assert!(prompt.contains("INTENT SIGNALS"));
        assert!(prompt.contains("Hiring a digital transformation lead"));
        assert!(prompt.contains("NOT READY"));
        assert!(prompt.contains("whyReachOutNow"));
        assert!(prompt.contains("Return ONLY a JSON object"));
    }

    #[test]
    fn prompt_fences_signal_content() {
        let prompt = build_synthesis_prompt(&lead_with_signal());
        assert!(prompt.contains("<<<BEGIN_UNTRUSTED_DATA>>>"));
    }

    #[test]
    fn extracts_fenced_json() {
        let response = "Here you go:\n```json\n{\"outreachScore\": 8}\n```\nDone.";
        assert_eq!(extract_json(response), Some("{\"outreachScore\": 8}"));
    }

    #[test]
    fn extracts_raw_object() {
        assert_eq!(extract_json("  {\"a\": 1}  "), Some("{\"a\": 1}"));
    }

    #[test]
    fn extracts_embedded_object_with_nested_braces() {
        let response = "Sure thing: {\"a\": {\"b\": \"with } brace in string\"}} trailing";
        let json = extract_json(response).unwrap();
        assert!(serde_json::from_str::<serde_json::Value>(json).is_ok());
    }

    #[test]
    fn no_json_returns_none() {
        assert!(extract_json("I cannot help with that.").is_none());
    }

    #[test]
    fn parse_full_response() {
        let response = r#"{
            "whyReachOutNow": "They posted a digital transformation role this week.",
            "personalizationHooks": ["New transformation hire (Source: job posting)"],
            "recommendedAngle": "Peer-district modernization story",
            "predictedObjections": ["Already mid-procurement"],
            "counterToObjections": {"Already mid-procurement": "Offer a reference call, not a pitch"},
            "doNotMention": ["Their 2019 outage lawsuit"],
            "outreachScore": 8,
            "scoreReasoning": "Fresh hiring signal plus documented pain"
        }"#;
        let ctx = parse_synthesis_response(response).unwrap();
        assert_eq!(ctx.outreach_score, 8);
        assert_eq!(ctx.personalization_hooks.len(), 1);
        assert_eq!(
            ctx.counter_to_objections["Already mid-procurement"],
            "Offer a reference call, not a pitch"
        );
    }

    #[test]
    fn parse_caps_hooks_at_three() {
        let response = r#"{
            "whyReachOutNow": "Trigger.",
            "personalizationHooks": ["a", "b", "c", "d", "e"],
            "outreachScore": 5
        }"#;
        let ctx = parse_synthesis_response(response).unwrap();
        assert_eq!(ctx.personalization_hooks.len(), 3);
    }

    #[test]
    fn parse_clamps_score_into_range() {
        let ctx = parse_synthesis_response(r#"{"whyReachOutNow": "x", "outreachScore": 40}"#)
            .unwrap();
        assert_eq!(ctx.outreach_score, 10);
        let ctx = parse_synthesis_response(r#"{"whyReachOutNow": "x", "outreachScore": -2}"#)
            .unwrap();
        assert_eq!(ctx.outreach_score, 1);
    }

    #[test]
    fn parse_without_json_is_fatal() {
        let err = parse_synthesis_response("no structured data here").unwrap_err();
        assert!(matches!(err, EngineError::NoJsonInResponse));
    }

    #[test]
    fn parse_malformed_json_errors() {
        let err = parse_synthesis_response("{\"whyReachOutNow\": [42]}").unwrap_err();
        assert!(matches!(err, EngineError::ResponseParse(_)));
    }
}
