//! In-memory filtering and statistics over stored messages.
//!
//! The store itself is external; these helpers apply the date, category and
//! threat filters to a slice the caller already holds, returning the most
//! recent messages first.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Category, StoredMessage};

/// Date label format accepted everywhere (`YYYY-MM-DD`).
pub const DATE_LABEL_FORMAT: &str = "%Y-%m-%d";

/// Inbox filtering errors.
#[derive(Debug, thiserror::Error)]
pub enum InboxError {
    /// The date label is not `YYYY-MM-DD`.
    #[error("invalid date '{label}', expected YYYY-MM-DD")]
    InvalidDate {
        /// Rejected input.
        label: String,
    },
}

/// Parse a `YYYY-MM-DD` label.
///
/// # Errors
///
/// Returns [`InboxError::InvalidDate`] for anything else.
pub fn parse_date_label(label: &str) -> Result<NaiveDate, InboxError> {
    NaiveDate::parse_from_str(label.trim(), DATE_LABEL_FORMAT).map_err(|_| {
        InboxError::InvalidDate {
            label: label.to_owned(),
        }
    })
}

/// Format a date as a digest label.
pub fn date_label(date: NaiveDate) -> String {
    date.format(DATE_LABEL_FORMAT).to_string()
}

/// First and last instant of a UTC day, both inclusive.
pub fn day_bounds(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = date.and_time(NaiveTime::MIN).and_utc();
    let end = date
        .succ_opt()
        .map(|next| next.and_time(NaiveTime::MIN).and_utc())
        .and_then(|next| next.checked_sub_signed(Duration::nanoseconds(1)))
        .unwrap_or(DateTime::<Utc>::MAX_UTC);
    (start, end)
}

/// Message selection criteria. Empty criteria select everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageFilter {
    /// Keep only messages received on this UTC day.
    pub date: Option<NaiveDate>,
    /// Keep only messages in this category.
    pub category: Option<Category>,
    /// Keep only threat-flagged messages.
    pub threats_only: bool,
    /// Keep only messages received at or after this instant.
    pub since: Option<DateTime<Utc>>,
}

impl MessageFilter {
    /// Messages of a single day.
    pub fn on_date(date: NaiveDate) -> Self {
        Self {
            date: Some(date),
            ..Self::default()
        }
    }

    /// Messages from the last `days` days, relative to `now`.
    pub fn recent(now: DateTime<Utc>, days: u32) -> Self {
        let since = now
            .checked_sub_signed(Duration::days(i64::from(days)))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        Self {
            since: Some(since),
            ..Self::default()
        }
    }

    /// Whether one message passes every criterion.
    pub fn matches(&self, message: &StoredMessage) -> bool {
        if let Some(date) = self.date {
            let (start, end) = day_bounds(date);
            if message.timestamp < start || message.timestamp > end {
                return false;
            }
        }
        if let Some(since) = self.since {
            if message.timestamp < since {
                return false;
            }
        }
        if let Some(category) = self.category {
            if message.category != Some(category) {
                return false;
            }
        }
        !self.threats_only || message.is_threat
    }

    /// Matching messages, most recent first.
    pub fn apply(&self, messages: &[StoredMessage]) -> Vec<StoredMessage> {
        let mut selected: Vec<StoredMessage> = messages
            .iter()
            .filter(|message| self.matches(message))
            .cloned()
            .collect();
        selected.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        selected
    }
}

/// Headline counts for a message set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboxStats {
    /// Number of messages.
    pub total: usize,
    /// Threat-flagged messages.
    pub threats: usize,
    /// Messages carrying a one-time code.
    pub otp_messages: usize,
    /// Messages asking for money.
    pub money_requests: usize,
    /// Count per category label (`uncategorized` for records without one).
    pub by_category: BTreeMap<String, usize>,
}

impl InboxStats {
    /// Count everything in one pass.
    pub fn from_messages(messages: &[StoredMessage]) -> Self {
        let mut stats = Self {
            total: messages.len(),
            ..Self::default()
        };
        for message in messages {
            if message.is_threat {
                stats.threats = stats.threats.saturating_add(1);
            }
            if message.has_otp {
                stats.otp_messages = stats.otp_messages.saturating_add(1);
            }
            if message.has_money_request {
                stats.money_requests = stats.money_requests.saturating_add(1);
            }
            let label = message.category_label(crate::digest::UNCATEGORIZED);
            let entry = stats.by_category.entry(label.to_owned()).or_insert(0);
            *entry = entry.saturating_add(1);
        }
        stats
    }
}
