//! Deterministic keyword-driven answers.
//!
//! Used when no backend is configured, every tier fails, or the caller
//! cancels the remote phase. Keyword checks run over the lower-cased query in
//! a fixed order: count, show/list, summarize, then a generic hint.

use crate::types::{Category, StoredMessage};

use super::context::preview;

/// Maximum messages listed by a show/list answer.
pub const MAX_LISTED: usize = 5;

/// Body characters shown per listed OTP message.
pub const LISTED_BODY_CHARS: usize = 80;

/// Label used for records without a category in summaries.
pub const OTHER: &str = "other";

/// Answer `query` from `messages` without any remote call.
pub fn rule_based_answer(query: &str, messages: &[StoredMessage]) -> String {
    let lower = query.to_lowercase();

    if contains_any(&lower, &["how many", "count", "number of"]) {
        return count_answer(&lower, messages);
    }

    if contains_any(&lower, &["show", "list"]) {
        if lower.contains("otp") {
            return list_otps(messages);
        }
        if lower.contains("threat") {
            return list_threats(messages);
        }
    }

    if contains_any(&lower, &["summarize", "summary"]) {
        return summary_answer(messages);
    }

    format!(
        "I found {} messages. Try asking 'how many offers' or 'show OTPs' or 'summarize today'.",
        messages.len()
    )
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

fn count_in(messages: &[StoredMessage], category: Category) -> usize {
    messages
        .iter()
        .filter(|m| m.category == Some(category))
        .count()
}

fn count_answer(lower: &str, messages: &[StoredMessage]) -> String {
    if lower.contains("otp") {
        format!("You have {} OTP messages.", count_in(messages, Category::Otp))
    } else if lower.contains("offer") {
        format!(
            "You have {} offer messages.",
            count_in(messages, Category::Offers)
        )
    } else if contains_any(lower, &["bank", "finance"]) {
        format!(
            "You have {} banking messages.",
            count_in(messages, Category::Finance)
        )
    } else if contains_any(lower, &["threat", "scam"]) {
        let threats = messages.iter().filter(|m| m.is_threat).count();
        format!("You have {threats} potential threat messages flagged.")
    } else {
        format!("You have {} total messages.", messages.len())
    }
}

fn list_otps(messages: &[StoredMessage]) -> String {
    let otps: Vec<&StoredMessage> = messages.iter().filter(|m| m.has_otp).take(MAX_LISTED).collect();
    if otps.is_empty() {
        return "No OTP messages found.".to_owned();
    }
    let mut answer = String::from("Recent OTP messages:\n");
    for message in otps {
        answer.push_str(&format!(
            "- From {}: {}\n",
            message.sender,
            preview(&message.body, LISTED_BODY_CHARS)
        ));
    }
    answer
}

fn list_threats(messages: &[StoredMessage]) -> String {
    let threats: Vec<&StoredMessage> = messages
        .iter()
        .filter(|m| m.is_threat)
        .take(MAX_LISTED)
        .collect();
    if threats.is_empty() {
        return "No threats detected.".to_owned();
    }
    let mut answer = String::from("Flagged threat messages:\n");
    // Records imported from elsewhere may carry the flag without a reason.
    for message in threats {
        answer.push_str(&format!(
            "- From {}: {}\n",
            message.sender,
            message.threat_reason.as_deref().unwrap_or("no reason recorded")
        ));
    }
    answer
}

/// Category counts as `(label, count)`, descending, ties in first-seen order.
pub fn category_breakdown(messages: &[StoredMessage]) -> Vec<(&'static str, usize)> {
    let mut counts: Vec<(&'static str, usize)> = Vec::new();
    for message in messages {
        let label = message.category_label(OTHER);
        match counts.iter_mut().find(|(name, _)| *name == label) {
            Some((_, count)) => *count = count.saturating_add(1),
            None => counts.push((label, 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

fn summary_answer(messages: &[StoredMessage]) -> String {
    let parts: Vec<String> = category_breakdown(messages)
        .into_iter()
        .map(|(category, count)| format!("{count} {category}"))
        .collect();
    format!("Summary: {}", parts.join(", "))
}
