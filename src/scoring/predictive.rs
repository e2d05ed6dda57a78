//! Conversion-probability model (pure, hand-tuned linear weighting).
//!
//! Starts at a base score and accumulates signed contributions across four
//! categories, each recorded as an explainable `ScoreFactor`. Not a learned
//! model; weights are fixed.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use crate::types::{
    Confidence, FactorCategory, Lead, PredictiveScore, ScoreFactor, ValueTier,
};

/// Everything starts here; factors move the score up or down from this.
const BASE_SCORE: i32 = 30;

/// Days within which a prior touch slightly deprioritizes the lead.
const RECENT_CONTACT_DAYS: i64 = 7;

/// Key fields counted toward the data-completeness bonus.
const KEY_FIELD_COUNT: usize = 7;

fn factor(
    name: &str,
    impact: i32,
    description: String,
    category: FactorCategory,
) -> ScoreFactor {
    ScoreFactor {
        name: name.to_string(),
        impact,
        description,
        category,
    }
}

/// Compute a fresh 0-100 conversion-probability report for one lead.
pub fn calculate_predictive_score(lead: &Lead) -> PredictiveScore {
    calculate_predictive_score_at(lead, Utc::now())
}

pub fn calculate_predictive_score_at(lead: &Lead, now: DateTime<Utc>) -> PredictiveScore {
    let mut factors: Vec<ScoreFactor> = Vec::new();

    engagement_factors(lead, now, &mut factors);
    fit_factors(lead, &mut factors);
    timing_factors(lead, &mut factors);
    data_quality_factors(lead, &mut factors);

    let raw: i32 = BASE_SCORE + factors.iter().map(|f| f.impact).sum::<i32>();
    let probability = raw.clamp(0, 100) as u8;

    // Confidence tracks how much we know, not how good the fit looks.
    let positive = factors.iter().filter(|f| f.impact > 0).count();
    let total = factors.len();
    let confidence_level = if positive >= 5 && total >= 8 {
        Confidence::High
    } else if positive >= 3 && total >= 5 {
        Confidence::Medium
    } else {
        Confidence::Low
    };

    let predicted_value = match lead.population {
        Some(p) if p > 300_000 => ValueTier::High,
        Some(p) if p > 100_000 => ValueTier::Medium,
        _ => ValueTier::Low,
    };

    let recommended_action = if probability >= 70 {
        "Call immediately - high conversion probability"
    } else if probability >= 50 {
        "Enrich missing data, then call"
    } else if probability >= 30 {
        "Add to batch outreach"
    } else {
        "Archive or verify data quality"
    }
    .to_string();

    factors.sort_by_key(|f| std::cmp::Reverse(f.impact.abs()));

    PredictiveScore {
        lead_id: lead.id.clone(),
        predicted_conversion_probability: probability,
        confidence_level,
        score_factors: factors,
        recommended_action,
        next_best_action: next_best_action(lead),
        predicted_value,
    }
}

fn engagement_factors(lead: &Lead, now: DateTime<Utc>, factors: &mut Vec<ScoreFactor>) {
    let dm_count = lead.decision_makers.len();
    if dm_count >= 1 {
        factors.push(factor(
            "decision_maker_identified",
            15,
            format!("{} decision maker(s) on record", dm_count),
            FactorCategory::Engagement,
        ));
        if dm_count > 1 {
            let extra = (dm_count as i32 * 4).min(12);
            factors.push(factor(
                "multiple_contacts",
                extra,
                "Multiple contacts widen the path in".to_string(),
                FactorCategory::Engagement,
            ));
        }
    } else {
        factors.push(factor(
            "no_decision_maker",
            -10,
            "No decision maker identified yet".to_string(),
            FactorCategory::Engagement,
        ));
    }

    if lead.email.is_some() {
        factors.push(factor(
            "email_on_file",
            10,
            "Direct email available".to_string(),
            FactorCategory::Engagement,
        ));
    }
    if lead.phone.is_some() {
        factors.push(factor(
            "phone_on_file",
            8,
            "Direct phone available".to_string(),
            FactorCategory::Engagement,
        ));
    }

    // Prior-contact outcome overrides recency.
    match lead.last_contact_outcome.as_deref() {
        Some("interested") | Some("callback_scheduled") => {
            factors.push(factor(
                "positive_prior_contact",
                20,
                "Previous contact ended positively".to_string(),
                FactorCategory::Engagement,
            ));
        }
        Some("not_interested") => {
            factors.push(factor(
                "negative_prior_contact",
                -25,
                "Previous contact declined".to_string(),
                FactorCategory::Engagement,
            ));
        }
        _ => {
            if let Some(last) = lead.last_contact_date {
                if now - last < Duration::days(RECENT_CONTACT_DAYS) {
                    factors.push(factor(
                        "recently_contacted",
                        -5,
                        "Touched within the last week; avoid double-touching".to_string(),
                        FactorCategory::Engagement,
                    ));
                }
            }
        }
    }
}

fn fit_factors(lead: &Lead, factors: &mut Vec<ScoreFactor>) {
    if let Some(population) = lead.population {
        let (impact, tier) = if population > 500_000 {
            (20, "large")
        } else if population > 100_000 {
            (15, "medium")
        } else if population > 50_000 {
            (10, "small")
        } else {
            (5, "minimal")
        };
        factors.push(factor(
            "population_tier",
            impact,
            format!("Population {} falls in the {} tier", population, tier),
            FactorCategory::Fit,
        ));
    }

    if let Some(maturity) = lead.tech_maturity {
        // Sweet spot: mature enough to integrate, not so mature the problem
        // is already solved.
        if (4..=6).contains(&maturity) {
            factors.push(factor(
                "tech_maturity_sweet_spot",
                12,
                format!("Tech maturity {} sits in the 4-6 sweet spot", maturity),
                FactorCategory::Fit,
            ));
        } else if maturity < 4 {
            factors.push(factor(
                "tech_maturity_low",
                -5,
                format!("Tech maturity {} may struggle to integrate", maturity),
                FactorCategory::Fit,
            ));
        } else {
            factors.push(factor(
                "tech_maturity_high",
                -3,
                format!("Tech maturity {} has likely solved this already", maturity),
                FactorCategory::Fit,
            ));
        }
    }

    if !lead.pain_points.is_empty() {
        let count = lead.pain_points.len() as i32;
        factors.push(factor(
            "pain_points_documented",
            10 + (count * 3).min(15),
            format!("{} documented pain point(s)", count),
            FactorCategory::Fit,
        ));
    }

    if !lead.buying_signals.is_empty() {
        let count = lead.buying_signals.len() as i32;
        factors.push(factor(
            "buying_signals_present",
            15 + (count * 5).min(15),
            format!("{} active buying signal(s)", count),
            FactorCategory::Fit,
        ));
    }
}

fn timing_factors(lead: &Lead, factors: &mut Vec<ScoreFactor>) {
    if !lead.recent_news.is_empty() {
        factors.push(factor(
            "recent_news",
            8,
            "Recent news coverage creates an opening".to_string(),
            FactorCategory::Timing,
        ));
    }
    if !lead.competitor_mentions.is_empty() {
        // Competitor presence reads as evidence of existing budget.
        factors.push(factor(
            "competitor_mentions",
            5,
            "Competitor activity suggests allocated budget".to_string(),
            FactorCategory::Timing,
        ));
    }
}

fn data_quality_factors(lead: &Lead, factors: &mut Vec<ScoreFactor>) {
    if let Some(enrichment) = lead.enrichment_score {
        let impact = (enrichment * 0.2).round() as i32;
        if impact != 0 {
            factors.push(factor(
                "enrichment_depth",
                impact,
                format!("Enrichment score {:.0}", enrichment),
                FactorCategory::DataQuality,
            ));
        }
    }

    let populated = key_fields_populated(lead);
    if populated as f64 / KEY_FIELD_COUNT as f64 >= 0.7 {
        factors.push(factor(
            "profile_completeness",
            10,
            format!("{}/{} key fields populated", populated, KEY_FIELD_COUNT),
            FactorCategory::DataQuality,
        ));
    }
}

fn key_fields_populated(lead: &Lead) -> usize {
    [
        !lead.company_name.is_empty(),
        lead.email.is_some(),
        lead.phone.is_some(),
        lead.population.is_some(),
        lead.tech_maturity.is_some(),
        lead.industry.is_some(),
        lead.website.is_some(),
    ]
    .iter()
    .filter(|present| **present)
    .count()
}

/// The single highest-leverage thing to do next for this lead.
fn next_best_action(lead: &Lead) -> String {
    if lead.decision_makers.is_empty() {
        "Identify a decision maker".to_string()
    } else if lead.email.is_none() {
        "Find a direct email for the primary contact".to_string()
    } else if lead.enrichment_score.unwrap_or(0.0) < 50.0 {
        "Run enrichment to fill profile gaps".to_string()
    } else if lead.recent_news.is_empty() {
        "Search for a recent trigger event".to_string()
    } else {
        "Prepare personalized outreach".to_string()
    }
}

/// Score every lead. Pure map wrapper; no persistence.
pub fn score_all_leads(leads: &[Lead]) -> Vec<PredictiveScore> {
    let now = Utc::now();
    leads
        .iter()
        .map(|lead| calculate_predictive_score_at(lead, now))
        .collect()
}

/// Top `n` leads by predicted conversion probability, descending.
pub fn top_predicted(leads: &[Lead], n: usize) -> Vec<PredictiveScore> {
    let mut scores = score_all_leads(leads);
    scores.sort_by(|a, b| {
        b.predicted_conversion_probability
            .cmp(&a.predicted_conversion_probability)
    });
    scores.truncate(n);
    scores
}

/// Group scored leads by recommended action bucket.
pub fn leads_by_action(leads: &[Lead]) -> HashMap<String, Vec<PredictiveScore>> {
    let mut grouped: HashMap<String, Vec<PredictiveScore>> = HashMap::new();
    for score in score_all_leads(leads) {
        grouped
            .entry(score.recommended_action.clone())
            .or_default()
            .push(score);
    }
    grouped
}
