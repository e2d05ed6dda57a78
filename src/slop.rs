//! Deterministic genericness linter for outreach copy.
//!
//! A penalty accumulator, not a classifier: every rule is independently
//! explainable and additive, with the total capped at 100. Consumers treat
//! <20 as great, <40 as acceptable, and anything above as needing work.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::types::SlopAnalysis;

/// Penalty per banned-phrase occurrence.
const BANNED_PHRASE_PENALTY: u32 = 15;
/// Penalty for a generic opener.
const WEAK_OPENER_PENALTY: u32 = 20;
/// Penalty per vague call-to-action found.
const VAGUE_CTA_PENALTY: u32 = 10;
/// Penalty when the message runs past the sentence budget.
const TOO_LONG_PENALTY: u32 = 10;
/// Penalty when the opener cites nothing specific about the prospect.
const NO_REFERENCE_PENALTY: u32 = 15;
/// Penalty per exclamation mark beyond the first.
const EXTRA_EXCLAMATION_PENALTY: u32 = 5;
/// Penalty when an unrecognized all-caps word appears.
const SHOUTING_PENALTY: u32 = 5;

/// Sentence budget before the length penalty kicks in.
const MAX_SENTENCES: usize = 5;

/// Generic sales clichés. Matched as lowercase substrings.
const BANNED_PHRASES: &[&str] = &[
    "i hope this finds you well",
    "i hope this email finds you well",
    "i hope you're doing well",
    "i hope you are doing well",
    "just checking in",
    "just following up",
    "touching base",
    "touch base",
    "circle back",
    "circling back",
    "quick question",
    "quick call",
    "pick your brain",
    "synergy",
    "synergies",
    "win-win",
    "game changer",
    "game-changing",
    "cutting-edge",
    "cutting edge",
    "state-of-the-art",
    "state of the art",
    "best-in-class",
    "best in class",
    "industry-leading",
    "industry leading",
    "world-class",
    "revolutionary",
    "disruptive",
    "leverage our",
    "leverage your",
    "next level",
    "low-hanging fruit",
    "move the needle",
    "think outside the box",
    "at the end of the day",
    "no-brainer",
    "value proposition",
    "one-stop shop",
    "end-to-end solution",
    "seamless integration",
    "seamlessly",
    "robust solution",
    "innovative solution",
    "empower your",
    "unlock the power",
    "supercharge",
    "skyrocket",
    "don't miss out",
    "limited time",
    "act now",
    "guaranteed results",
];

/// Vague calls to action that ask for nothing concrete.
const VAGUE_CTAS: &[&str] = &[
    "let me know if interested",
    "let me know if you're interested",
    "let me know if you are interested",
    "let me know your thoughts",
    "let me know what you think",
    "feel free to reach out",
    "happy to chat",
    "would love to connect",
    "would love to chat",
    "hop on a call",
    "open to a conversation",
    "any interest",
];

/// All-caps words that are legitimate company/role acronyms.
const ACRONYM_WHITELIST: &[&str] = &[
    "ASAP", "HIPAA", "GDPR", "CCPA", "SCADA", "ERP", "CRM", "SAAS", "CISO", "CIOS", "CTOS",
    "API", "APIS", "RFPS", "SOC2", "FERPA",
];

fn re_weak_opener() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)^\s*(hi|hello|hey|greetings|dear)\b|(?i)my name is|(?i)^\s*(we are|we're) a\b|(?i)i wanted to (reach out|introduce|connect)|(?i)^\s*(i am|i'm) (writing|reaching out)",
        )
        .unwrap()
    })
}

fn re_specific_reference() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)your (recent|post|article|comment|review|announcement|job posting|interview|talk|podcast|team)|(?i)(noticed|saw|read|came across|listened to) (that )?(you|your)|(?i)regarding your|(?i)congrat(s|ulations) on",
        )
        .unwrap()
    })
}

fn re_all_caps_word() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b[A-Z][A-Z0-9]{3,}\b").unwrap())
}

/// Split into sentence fragments, keeping only substantive ones.
fn sentences(text: &str) -> Vec<&str> {
    text.split(['.', '!', '?'])
        .map(str::trim)
        .filter(|fragment| fragment.len() > 10)
        .collect()
}

/// First sentence of the message, used for opener checks.
fn opener(text: &str) -> &str {
    text.split(['.', '!', '?']).next().unwrap_or("").trim()
}

/// Banned phrases present in the text, for post-hoc validation of
/// generated content.
pub fn find_banned_phrases(text: &str) -> Vec<&'static str> {
    let lower = text.to_lowercase();
    BANNED_PHRASES
        .iter()
        .filter(|phrase| lower.contains(**phrase))
        .copied()
        .collect()
}

/// Lint a message for generic, clichéd, low-specificity copy.
pub fn analyze_message(text: &str) -> SlopAnalysis {
    let mut score: u32 = 0;
    let mut issues = Vec::new();
    let mut improvements = Vec::new();

    let lower = text.to_lowercase();

    for phrase in BANNED_PHRASES {
        let count = lower.matches(phrase).count() as u32;
        if count > 0 {
            score += BANNED_PHRASE_PENALTY * count;
            issues.push(format!("Banned phrase: \"{}\"", phrase));
        }
    }
    if !issues.is_empty() {
        improvements.push("Replace clichés with specifics about this prospect".to_string());
    }

    let first = opener(text);
    if re_weak_opener().is_match(first) {
        score += WEAK_OPENER_PENALTY;
        issues.push("Generic opener".to_string());
        improvements.push("Open with an observation about them, not an introduction".to_string());
    }

    for cta in VAGUE_CTAS {
        if lower.contains(cta) {
            score += VAGUE_CTA_PENALTY;
            issues.push(format!("Vague call to action: \"{}\"", cta));
            improvements.push("End with one concrete, answerable ask".to_string());
        }
    }

    let sentence_count = sentences(text).len();
    if sentence_count > MAX_SENTENCES {
        score += TOO_LONG_PENALTY;
        issues.push(format!(
            "Too long: {} sentences (aim for {} or fewer)",
            sentence_count, MAX_SENTENCES
        ));
        improvements.push("Cut to the single strongest point".to_string());
    }

    let is_follow_up = lower.contains("following up");
    if !is_follow_up && !re_specific_reference().is_match(first) {
        score += NO_REFERENCE_PENALTY;
        issues.push("Opener does not reference anything specific about the prospect".to_string());
        improvements.push("Cite the post, review, or news item that prompted this".to_string());
    }

    let exclamations = text.matches('!').count() as u32;
    if exclamations > 1 {
        score += EXTRA_EXCLAMATION_PENALTY * (exclamations - 1);
        issues.push(format!("{} exclamation marks", exclamations));
        improvements.push("One exclamation mark at most".to_string());
    }

    let whitelist: HashSet<&str> = ACRONYM_WHITELIST.iter().copied().collect();
    let shouting = re_all_caps_word()
        .find_iter(text)
        .any(|m| !whitelist.contains(m.as_str()));
    if shouting {
        score += SHOUTING_PENALTY;
        issues.push("All-caps word reads as shouting".to_string());
        improvements.push("Drop the all-caps emphasis".to_string());
    }

    SlopAnalysis {
        score: score.min(100) as u8,
        issues,
        improvements,
    }
}

/// Band label for a slop score.
pub fn score_label(score: u8) -> &'static str {
    if score < 20 {
        "great"
    } else if score < 40 {
        "acceptable"
    } else {
        "needs work"
    }
}
