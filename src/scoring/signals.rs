//! Intent signal scoring (pure math, no I/O).
//!
//! Each signal is scored as
//! `type_weight * relevance_multiplier * recency_multiplier * hot_bonus * strength/10`,
//! then the full signal set is aggregated with positional diminishing
//! weight so breadth of corroborating signals counts without letting a
//! long tail of weak old signals dominate.

use std::collections::HashMap;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::types::{
    Classification, CompositeScoreResult, IntentSignal, Lead, LeadSignalScore, Relevance,
    ScoredSignal, SignalType, Urgency, UrgencyResult,
};

/// Multiplier applied when content matches an explicit buying-intent pattern.
const HOT_PATTERN_BONUS: f64 = 1.5;

/// Signals matched against explicit evaluation/switching intent.
fn re_hot_patterns() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)looking for alternatives?|looking to (switch|replace|migrate)|\bRFP\b|request for proposal|budget (approved|allocated)|evaluating (vendors|options|solutions)|switching (from|away)|migrating (off|away|from)|recommendations? for a|anyone (using|recommend)|shortlist|proof of concept|\bPOC\b|vendor selection",
        )
        .unwrap()
    })
}

/// True if the content contains an explicit evaluation/switching phrase.
pub fn is_hot_signal(content: &str) -> bool {
    re_hot_patterns().is_match(content)
}

/// Base weight per signal type. Unknown types score like tech changes.
fn type_weight(signal_type: SignalType) -> f64 {
    match signal_type {
        SignalType::RedditPost => 10.0,
        SignalType::G2Review => 9.0,
        SignalType::JobPosting => 7.0,
        SignalType::News => 6.0,
        SignalType::TechChange => 5.0,
        SignalType::Other => 5.0,
    }
}

/// Relevance multiplier. Unknown relevance counts as adjacent.
fn relevance_multiplier(relevance: Relevance) -> f64 {
    match relevance {
        Relevance::Direct => 1.5,
        Relevance::Adjacent => 1.0,
        Relevance::Weak => 0.5,
        Relevance::Other => 1.0,
    }
}

/// Step-function intent decay over signal age in days.
///
/// A signal loses roughly half its weight by two months and recovers full
/// weight only for same-day events.
pub fn recency_multiplier(age_days: f64) -> f64 {
    if age_days <= 1.0 {
        2.0
    } else if age_days <= 3.0 {
        1.8
    } else if age_days <= 7.0 {
        1.5
    } else if age_days <= 14.0 {
        1.2
    } else if age_days <= 30.0 {
        1.0
    } else if age_days <= 60.0 {
        0.7
    } else {
        0.5
    }
}

/// Fractional days between a signal date and `now`. Future-dated signals
/// count as age zero.
fn age_days(signal_date: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let secs = (now - signal_date).num_seconds() as f64;
    (secs / 86_400.0).max(0.0)
}

/// Score a single signal against a fixed reference time.
pub fn score_signal_at(signal: &IntentSignal, now: DateTime<Utc>) -> f64 {
    let weight = type_weight(signal.signal_type);
    let relevance = relevance_multiplier(signal.relevance_to_us);
    let recency = recency_multiplier(age_days(signal.signal_date, now));
    let hot = if is_hot_signal(&signal.signal_content) {
        HOT_PATTERN_BONUS
    } else {
        1.0
    };
    let strength = f64::from(signal.signal_strength) / 10.0;
    let raw = weight * relevance * recency * hot * strength;
    (raw * 10.0).round() / 10.0
}

/// Score a single signal as of now.
pub fn score_signal(signal: &IntentSignal) -> f64 {
    score_signal_at(signal, Utc::now())
}

/// Aggregate a lead's signals into a composite 1-10 score.
///
/// All signals contribute, sorted descending, with positional diminishing
/// weight `1/(i+1)`; the top 3 are kept as evidence.
pub fn calculate_composite_score(signals: &[IntentSignal]) -> CompositeScoreResult {
    calculate_composite_score_at(signals, Utc::now())
}

pub fn calculate_composite_score_at(
    signals: &[IntentSignal],
    now: DateTime<Utc>,
) -> CompositeScoreResult {
    if signals.is_empty() {
        return CompositeScoreResult {
            score: 1,
            classification: Classification::Nurture,
            top_signals: Vec::new(),
            reasoning: "No intent signals detected".to_string(),
        };
    }

    let mut scored: Vec<ScoredSignal> = signals
        .iter()
        .map(|signal| ScoredSignal {
            signal: signal.clone(),
            score: score_signal_at(signal, now),
        })
        .collect();
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

    let weighted_sum: f64 = scored
        .iter()
        .enumerate()
        .map(|(i, s)| s.score / (i as f64 + 1.0))
        .sum();

    let score = ((weighted_sum / 3.0).round() as i64).clamp(1, 10) as u8;
    let classification = Classification::from_score(score);

    let top = &scored[0];
    let reasoning = format!(
        "Top signal is a {} scored {:.1}; {} signal{} overall put this lead at {}",
        top.signal.signal_type,
        top.score,
        scored.len(),
        if scored.len() == 1 { "" } else { "s" },
        classification,
    );

    let top_signals = scored.into_iter().take(3).collect();

    CompositeScoreResult {
        score,
        classification,
        top_signals,
        reasoning,
    }
}

/// Derive operational urgency guidance from a lead's signals.
///
/// Critical when any top-3 signal pairs an explicit intent phrase with
/// week-fresh recency, or when the composite score itself is 9+.
pub fn get_signal_urgency(signals: &[IntentSignal]) -> UrgencyResult {
    get_signal_urgency_at(signals, Utc::now())
}

pub fn get_signal_urgency_at(signals: &[IntentSignal], now: DateTime<Utc>) -> UrgencyResult {
    let composite = calculate_composite_score_at(signals, now);

    let fresh_hot_signal = composite.top_signals.iter().any(|s| {
        is_hot_signal(&s.signal.signal_content)
            && recency_multiplier(age_days(s.signal.signal_date, now)) >= 1.5
    });

    if fresh_hot_signal || composite.score >= 9 {
        UrgencyResult {
            urgency: Urgency::Critical,
            action: "Call within 24 hours".to_string(),
            deadline: "24 hours".to_string(),
        }
    } else if composite.score >= 7 {
        UrgencyResult {
            urgency: Urgency::High,
            action: "Reach out this week with a personalized message".to_string(),
            deadline: "This week".to_string(),
        }
    } else if composite.score >= 4 {
        UrgencyResult {
            urgency: Urgency::Medium,
            action: "Add to this month's outreach queue".to_string(),
            deadline: "This month".to_string(),
        }
    } else {
        UrgencyResult {
            urgency: Urgency::Low,
            action: "Add to nurture sequence".to_string(),
            deadline: "No deadline".to_string(),
        }
    }
}

/// Score every lead's signal set. Pure batch wrapper; no side effects,
/// order-independent.
pub fn score_leads_signals(leads: &[Lead]) -> HashMap<String, LeadSignalScore> {
    let now = Utc::now();
    leads
        .iter()
        .map(|lead| {
            let composite = calculate_composite_score_at(&lead.intent_signals, now);
            (
                lead.id.clone(),
                LeadSignalScore {
                    score: composite.score,
                    classification: composite.classification,
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn signal(
        signal_type: SignalType,
        age_days: i64,
        content: &str,
        strength: u8,
        relevance: Relevance,
    ) -> IntentSignal {
        IntentSignal {
            signal_type,
            signal_date: Utc::now() - Duration::days(age_days),
            signal_content: content.to_string(),
            signal_strength: strength,
            relevance_to_us: relevance,
            source_url: None,
        }
    }

    #[test]
    fn recency_same_day_is_double() {
        assert_eq!(recency_multiplier(0.0), 2.0);
        assert_eq!(recency_multiplier(0.9), 2.0);
    }

    #[test]
    fn recency_45_days_is_point_seven() {
        assert_eq!(recency_multiplier(45.0), 0.7);
    }

    #[test]
    fn recency_steps() {
        assert_eq!(recency_multiplier(2.0), 1.8);
        assert_eq!(recency_multiplier(5.0), 1.5);
        assert_eq!(recency_multiplier(10.0), 1.2);
        assert_eq!(recency_multiplier(20.0), 1.0);
        assert_eq!(recency_multiplier(90.0), 0.5);
    }

    #[test]
    fn hot_patterns_match_switching_intent() {
        assert!(is_hot_signal("We are looking for alternatives to VendorX"));
        assert!(is_hot_signal("Issued an RFP for dispatch software"));
        assert!(is_hot_signal("budget approved for new tooling"));
        assert!(!is_hot_signal("We enjoy our current vendor"));
    }

    #[test]
    fn score_signal_fresh_direct_reddit() {
        // 10 (reddit) * 1.5 (direct) * 2.0 (same day) * 1.0 * 0.8 = 24.0
        let s = signal(SignalType::RedditPost, 0, "General chatter", 8, Relevance::Direct);
        let now = Utc::now();
        assert_eq!(score_signal_at(&s, now), 24.0);
    }

    #[test]
    fn score_signal_hot_bonus_applies() {
        // 6 (news) * 1.0 * 2.0 * 1.5 * 0.5 = 9.0
        let s = signal(
            SignalType::News,
            0,
            "City budget approved for modernization",
            5,
            Relevance::Adjacent,
        );
        assert_eq!(score_signal_at(&s, Utc::now()), 9.0);
    }

    #[test]
    fn score_signal_rounds_to_one_decimal() {
        // 9 (g2) * 0.5 (weak) * 1.8 (2 days) * 1.0 * 0.7 = 5.67 -> 5.7
        let s = signal(SignalType::G2Review, 2, "meh review", 7, Relevance::Weak);
        assert_eq!(score_signal_at(&s, Utc::now()), 5.7);
    }

    #[test]
    fn empty_signals_give_nurture_sentinel() {
        let result = calculate_composite_score(&[]);
        assert_eq!(result.score, 1);
        assert_eq!(result.classification, Classification::Nurture);
        assert!(result.top_signals.is_empty());
        assert_eq!(result.reasoning, "No intent signals detected");
    }

    #[test]
    fn composite_is_deterministic_and_bounded() {
        let signals = vec![
            signal(SignalType::RedditPost, 0, "looking for alternatives", 9, Relevance::Direct),
            signal(SignalType::JobPosting, 5, "hiring ops manager", 6, Relevance::Adjacent),
            signal(SignalType::News, 40, "old news item", 3, Relevance::Weak),
        ];
        let now = Utc::now();
        let a = calculate_composite_score_at(&signals, now);
        let b = calculate_composite_score_at(&signals, now);
        assert_eq!(a.score, b.score);
        assert_eq!(a.classification, b.classification);
        assert!((1..=10).contains(&a.score));
        assert_eq!(a.classification, Classification::from_score(a.score));
    }

    #[test]
    fn composite_caps_top_signals_at_three() {
        let signals: Vec<IntentSignal> = (0..6)
            .map(|i| signal(SignalType::News, i, "news", 5, Relevance::Adjacent))
            .collect();
        let result = calculate_composite_score(&signals);
        assert_eq!(result.top_signals.len(), 3);
        // Strongest first.
        assert!(result.top_signals[0].score >= result.top_signals[1].score);
        assert!(result.top_signals[1].score >= result.top_signals[2].score);
    }

    #[test]
    fn strong_fresh_signals_classify_hot() {
        let signals = vec![
            signal(SignalType::RedditPost, 0, "looking for alternatives now", 10, Relevance::Direct),
            signal(SignalType::G2Review, 1, "evaluating vendors", 9, Relevance::Direct),
        ];
        let result = calculate_composite_score(&signals);
        assert_eq!(result.classification, Classification::Hot);
    }

    #[test]
    fn urgency_critical_on_fresh_hot_signal() {
        let signals = vec![signal(
            SignalType::RedditPost,
            0,
            "We are looking for alternatives, RFP out next week",
            8,
            Relevance::Direct,
        )];
        let result = get_signal_urgency(&signals);
        assert_eq!(result.urgency, Urgency::Critical);
        assert_eq!(result.action, "Call within 24 hours");
    }

    #[test]
    fn urgency_low_for_stale_weak_signals() {
        let signals = vec![signal(SignalType::News, 90, "minor mention", 2, Relevance::Weak)];
        let result = get_signal_urgency(&signals);
        assert_eq!(result.urgency, Urgency::Low);
        assert_eq!(result.action, "Add to nurture sequence");
    }

    #[test]
    fn urgency_low_with_no_signals() {
        assert_eq!(get_signal_urgency(&[]).urgency, Urgency::Low);
    }

    #[test]
    fn batch_scoring_covers_every_lead() {
        let leads = vec![
            Lead {
                id: "a".to_string(),
                company_name: "A".to_string(),
                intent_signals: vec![signal(
                    SignalType::RedditPost,
                    0,
                    "looking for alternatives",
                    10,
                    Relevance::Direct,
                )],
                ..Default::default()
            },
            Lead {
                id: "b".to_string(),
                company_name: "B".to_string(),
                ..Default::default()
            },
        ];
        let scores = score_leads_signals(&leads);
        assert_eq!(scores.len(), 2);
        assert_eq!(scores["b"].score, 1);
        assert_eq!(scores["b"].classification, Classification::Nurture);
        assert!(scores["a"].score > scores["b"].score);
    }
}
