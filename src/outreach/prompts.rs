//! Message prompt construction and labeled-section response parsing.
//!
//! The model is asked for labeled sections (`SUBJECT:`, `BODY:`, ...).
//! Parsing degrades gracefully: if no `BODY:` label is found, the whole
//! response is treated as body text with any stray label lines stripped.

use crate::types::{Lead, MessageType, SynthesizedContext};
use crate::util::wrap_user_data;

/// LinkedIn connection requests get truncated by the platform around here.
const LINKEDIN_CHAR_LIMIT: usize = 300;

/// A request to draft (or redraft) one outreach message.
#[derive(Debug, Clone)]
pub struct MessageRequest {
    pub lead: Lead,
    pub message_type: MessageType,
    pub synthesis: Option<SynthesizedContext>,
    pub custom_context: Option<String>,
}

/// Parsed sections of a model reply.
#[derive(Debug, Default)]
pub(crate) struct ParsedMessage {
    pub subject: Option<String>,
    pub body: String,
    pub hook_used: Option<String>,
    pub signal_referenced: Option<String>,
}

const SECTION_LABELS: &[&str] = &["SUBJECT:", "BODY:", "HOOK_USED:", "SIGNAL_REFERENCED:"];

/// Build the drafting prompt for a message request.
///
/// `feedback` is appended for regeneration; the engine keeps no memory of
/// the prior draft, so the caller supplies everything each time.
pub fn build_message_prompt(request: &MessageRequest, feedback: Option<&str>) -> String {
    let lead = &request.lead;
    let mut prompt = String::new();

    prompt.push_str(&format!(
        "Draft a {} for a B2B sales rep. Work only from the data below.\n\n",
        match request.message_type {
            MessageType::ColdEmail => "cold email",
            MessageType::Linkedin => "LinkedIn connection request",
            MessageType::FollowUpEmail => "follow-up email",
        }
    ));

    let mut facts = vec![format!("Company: {}", lead.company_name)];
    if let Some(ref industry) = lead.industry {
        facts.push(format!("Industry: {}", industry));
    }
    if let Some(dm) = lead.decision_makers.first() {
        match &dm.title {
            Some(title) => facts.push(format!("Recipient: {} ({})", dm.name, title)),
            None => facts.push(format!("Recipient: {}", dm.name)),
        }
    }
    prompt.push_str("LEAD:\n");
    prompt.push_str(&facts.join("\n"));
    prompt.push_str("\n\n");

    if let Some(ref synthesis) = request.synthesis {
        prompt.push_str(&format!("WHY NOW: {}\n", synthesis.why_reach_out_now));
        if !synthesis.personalization_hooks.is_empty() {
            prompt.push_str("HOOKS:\n");
            for hook in &synthesis.personalization_hooks {
                prompt.push_str(&format!("- {}\n", hook));
            }
        }
        if let Some(ref angle) = synthesis.recommended_angle {
            prompt.push_str(&format!("ANGLE: {}\n", angle));
        }
        if !synthesis.do_not_mention.is_empty() {
            prompt.push_str("DO NOT MENTION:\n");
            for item in &synthesis.do_not_mention {
                prompt.push_str(&format!("- {}\n", item));
            }
        }
        prompt.push('\n');
    }

    if let Some(ref context) = request.custom_context {
        prompt.push_str("ADDITIONAL CONTEXT:\n");
        prompt.push_str(&wrap_user_data(context));
        prompt.push_str("\n\n");
    }

    prompt.push_str("CONSTRAINTS:\n");
    match request.message_type {
        MessageType::ColdEmail => prompt.push_str(
            "- At most 4 sentences.\n\
             - The first sentence must reference a specific signal, post, or news item.\n\
             - End with exactly one concrete, answerable ask.\n\
             - Include a subject line under 8 words.\n",
        ),
        MessageType::Linkedin => prompt.push_str(&format!(
            "- At most 3 sentences.\n\
             - Keep the whole message under {} characters.\n\
             - The first sentence must reference something specific about them.\n\
             - No subject line.\n",
            LINKEDIN_CHAR_LIMIT
        )),
        MessageType::FollowUpEmail => prompt.push_str(
            "- At most 3 sentences.\n\
             - Reference the prior conversation naturally.\n\
             - End with exactly one concrete, answerable ask.\n",
        ),
    }
    prompt.push_str(
        "- No generic sales clichés (\"hope this finds you well\", \"circle back\", \
         \"synergy\", \"touching base\").\n\n",
    );

    if let Some(feedback) = feedback {
        prompt.push_str("USER FEEDBACK ON PREVIOUS VERSION:\n");
        prompt.push_str(&wrap_user_data(feedback));
        prompt.push_str("\n\n");
    }

    prompt.push_str(
        "Respond in exactly this format:\n\
         SUBJECT: <subject line, or omit this line for LinkedIn>\n\
         BODY:\n\
         <the message body>\n\
         HOOK_USED: <which hook you used, if any>\n\
         SIGNAL_REFERENCED: <which signal you referenced, if any>\n",
    );

    prompt
}

fn label_value(line: &str, label: &str) -> Option<String> {
    line.strip_prefix(label).map(|rest| rest.trim().to_string())
}

/// Parse a labeled-section reply. Never fails: a reply with no labels at
/// all becomes the body wholesale.
pub(crate) fn parse_message_response(response: &str) -> ParsedMessage {
    let mut parsed = ParsedMessage::default();
    let mut body_lines: Vec<&str> = Vec::new();
    let mut in_body = false;

    for line in response.lines() {
        let trimmed = line.trim_start();
        if let Some(value) = label_value(trimmed, "SUBJECT:") {
            in_body = false;
            if !value.is_empty() {
                parsed.subject = Some(value);
            }
        } else if trimmed.starts_with("BODY:") {
            in_body = true;
            let inline = trimmed["BODY:".len()..].trim();
            if !inline.is_empty() {
                body_lines.push(inline);
            }
        } else if let Some(value) = label_value(trimmed, "HOOK_USED:") {
            in_body = false;
            if !value.is_empty() {
                parsed.hook_used = Some(value);
            }
        } else if let Some(value) = label_value(trimmed, "SIGNAL_REFERENCED:") {
            in_body = false;
            if !value.is_empty() {
                parsed.signal_referenced = Some(value);
            }
        } else if in_body {
            body_lines.push(line);
        }
    }

    parsed.body = body_lines.join("\n").trim().to_string();

    if parsed.body.is_empty() {
        // Fallback: treat the whole reply as body, minus stray label lines.
        parsed.body = response
            .lines()
            .filter(|line| {
                let t = line.trim_start();
                !SECTION_LABELS.iter().any(|label| t.starts_with(label))
            })
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string();
    }

    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(message_type: MessageType) -> MessageRequest {
        MessageRequest {
            lead: Lead {
                id: "l1".to_string(),
                company_name: "Harbor Water District".to_string(),
                ..Default::default()
            },
            message_type,
            synthesis: None,
            custom_context: None,
        }
    }

    #[test]
    fn linkedin_prompt_carries_character_limit() {
        let prompt = build_message_prompt(&request(MessageType::Linkedin), None);
        assert!(prompt.contains("under 300 characters"));
        assert!(prompt.contains("At most 3 sentences"));
        assert!(prompt.contains("No subject line"));
    }

    #[test]
    fn cold_email_prompt_carries_sentence_cap_and_subject() {
        let prompt = build_message_prompt(&request(MessageType::ColdEmail), None);
        assert!(prompt.contains("At most 4 sentences"));
        assert!(prompt.contains("subject line"));
        assert!(prompt.contains("reference a specific signal"));
    }

    #[test]
    fn feedback_lands_under_its_heading() {
        let prompt =
            build_message_prompt(&request(MessageType::ColdEmail), Some("Too salesy, shorter"));
        assert!(prompt.contains("USER FEEDBACK ON PREVIOUS VERSION:"));
        assert!(prompt.contains("Too salesy, shorter"));
    }

    #[test]
    fn no_feedback_no_heading() {
        let prompt = build_message_prompt(&request(MessageType::ColdEmail), None);
        assert!(!prompt.contains("USER FEEDBACK"));
    }

    #[test]
    fn synthesis_hooks_feed_the_prompt() {
        let mut req = request(MessageType::ColdEmail);
        req.synthesis = Some(SynthesizedContext {
            why_reach_out_now: "RFP posted Monday.".to_string(),
            personalization_hooks: vec!["Fresh RFP (Source: portal)".to_string()],
            recommended_angle: Some("Procurement timeline".to_string()),
            predicted_objections: Vec::new(),
            counter_to_objections: Default::default(),
            do_not_mention: vec!["2019 lawsuit".to_string()],
            outreach_score: 8,
            score_reasoning: String::new(),
        });
        let prompt = build_message_prompt(&req, None);
        assert!(prompt.contains("WHY NOW: RFP posted Monday."));
        assert!(prompt.contains("Fresh RFP (Source: portal)"));
        assert!(prompt.contains("DO NOT MENTION:"));
        assert!(prompt.contains("2019 lawsuit"));
    }

    #[test]
    fn parses_fully_labeled_response() {
        let response = "SUBJECT: Storm response routing\n\
                        BODY:\n\
                        Saw your post about dispatch delays.\n\
                        Two neighboring utilities fixed this after similar storms.\n\
                        HOOK_USED: storm post\n\
                        SIGNAL_REFERENCED: reddit_post";
        let parsed = parse_message_response(response);
        assert_eq!(parsed.subject.as_deref(), Some("Storm response routing"));
        assert!(parsed.body.starts_with("Saw your post"));
        assert!(parsed.body.contains("neighboring utilities"));
        assert_eq!(parsed.hook_used.as_deref(), Some("storm post"));
        assert_eq!(parsed.signal_referenced.as_deref(), Some("reddit_post"));
    }

    #[test]
    fn unlabeled_response_becomes_body() {
        let parsed = parse_message_response("Just a plain draft with no labels at all.");
        assert_eq!(parsed.body, "Just a plain draft with no labels at all.");
        assert!(parsed.subject.is_none());
    }

    #[test]
    fn fallback_strips_stray_label_lines() {
        let response = "HOOK_USED:\nSome draft text the model wrote\nwithout a body label.";
        let parsed = parse_message_response(response);
        assert!(parsed.body.contains("Some draft text"));
        assert!(!parsed.body.contains("HOOK_USED"));
    }

    #[test]
    fn inline_body_on_label_line_is_kept() {
        let parsed = parse_message_response("BODY: Short inline draft.");
        assert_eq!(parsed.body, "Short inline draft.");
    }
}
