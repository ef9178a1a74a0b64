//! Per-day digest: category counts, one-line summaries and a threat total.

use serde::{Deserialize, Serialize};

use crate::types::StoredMessage;

/// Label used for records that carry no category.
pub const UNCATEGORIZED: &str = "uncategorized";

/// One category line in a digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDigestEntry {
    /// Category wire name, or `uncategorized`.
    pub category: String,
    /// Messages in this category.
    pub count: usize,
    /// One-line summary.
    pub summary: String,
}

/// Aggregation of a message set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Digest {
    /// Period label, usually `YYYY-MM-DD`.
    pub date: String,
    /// Number of messages aggregated; equals the sum of entry counts.
    pub total_messages: usize,
    /// Entries by descending count; ties keep first-seen order.
    pub categories: Vec<CategoryDigestEntry>,
    /// Threat-flagged messages across the whole set.
    pub threat_count: usize,
}

/// Build the digest for `messages`.
pub fn digest(messages: &[StoredMessage], date_label: &str) -> Digest {
    let mut groups: Vec<(&str, usize)> = Vec::new();
    let mut threat_count = 0usize;

    for message in messages {
        if message.is_threat {
            threat_count = threat_count.saturating_add(1);
        }
        let label = message.category_label(UNCATEGORIZED);
        match groups.iter_mut().find(|(name, _)| *name == label) {
            Some((_, count)) => *count = count.saturating_add(1),
            None => groups.push((label, 1)),
        }
    }

    let mut categories: Vec<CategoryDigestEntry> = groups
        .into_iter()
        .map(|(category, count)| CategoryDigestEntry {
            category: category.to_owned(),
            count,
            summary: category_summary(category, count),
        })
        .collect();
    // `sort_by` is stable, so equal counts keep first-seen order.
    categories.sort_by(|a, b| b.count.cmp(&a.count));

    Digest {
        date: date_label.to_owned(),
        total_messages: messages.len(),
        categories,
        threat_count,
    }
}

/// Templated one-line summary for a category.
pub fn category_summary(category: &str, count: usize) -> String {
    match category {
        "offers" => format!("{count} promotional offers and deals"),
        "finance" => format!("{count} banking and financial updates"),
        "travel" => format!("{count} travel and booking confirmations"),
        "otp" => format!("{count} OTP and verification codes"),
        "transactional" => format!("{count} order and delivery updates"),
        "promotional" => format!("{count} promotional messages"),
        other => format!("{count} {other} messages"),
    }
}
