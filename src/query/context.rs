//! Prompt construction for remote backends.

use crate::digest::UNCATEGORIZED;
use crate::types::StoredMessage;

/// Messages included in a query context by default.
pub const DEFAULT_CONTEXT_MESSAGES: usize = 20;

/// Body characters kept per message in a query context by default.
pub const DEFAULT_BODY_PREVIEW_CHARS: usize = 150;

/// Sample messages sent when asking for a category summary.
pub const SUMMARY_SAMPLE_MESSAGES: usize = 5;

/// Body characters kept per sample in a category summary prompt.
pub const SUMMARY_BODY_PREVIEW_CHARS: usize = 100;

/// First `max_chars` characters of `text`, on a char boundary.
pub fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

/// Numbered, bounded listing of `messages`.
///
/// At most `max_messages` entries; when more exist a trailing line reports how
/// many were left out.
pub fn build_context(messages: &[StoredMessage], max_messages: usize, body_chars: usize) -> String {
    let mut lines: Vec<String> = Vec::with_capacity(max_messages.saturating_mul(2));
    for (i, message) in messages.iter().take(max_messages).enumerate() {
        lines.push(format!(
            "{}. From: {} | {} | Category: {}",
            i.saturating_add(1),
            message.sender,
            message.timestamp.format("%Y-%m-%d %H:%M"),
            message.category_label(UNCATEGORIZED),
        ));
        lines.push(format!("   Message: {}", preview(&message.body, body_chars)));
    }

    let omitted = messages.len().saturating_sub(max_messages);
    if omitted > 0 {
        lines.push(format!("\n... and {omitted} more messages"));
    }

    lines.join("\n")
}

/// Prompt asking a backend to answer `query` from `context`.
pub fn build_query_prompt(query: &str, context: &str) -> String {
    format!(
        "You are an SMS assistant. Answer the user's question based on their SMS messages.\n\n\
         Messages context:\n{context}\n\n\
         User question: {query}\n\n\
         Provide a concise, helpful answer."
    )
}

/// Prompt asking a backend for a one-line summary of a category.
pub fn build_summary_prompt(category: &str, messages: &[StoredMessage]) -> String {
    let bodies: Vec<String> = messages
        .iter()
        .take(SUMMARY_SAMPLE_MESSAGES)
        .map(|m| format!("- {}", preview(&m.body, SUMMARY_BODY_PREVIEW_CHARS)))
        .collect();
    format!(
        "Summarize these {category} SMS messages in one concise line (max 15 words):\n\n{}\n\nSummary:",
        bodies.join("\n")
    )
}
