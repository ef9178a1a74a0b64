//! Core message types shared by the classifier, digest and query layers.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Classification bucket assigned to a message body.
///
/// Wire names are lower-case (`"otp"`, `"finance"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// One-time passwords and verification codes. Overrides every other category.
    Otp,
    /// Banking, payments, balances, loans.
    Finance,
    /// Discounts, coupons, cashback.
    Offers,
    /// Flights, trains, hotels, bookings.
    Travel,
    /// Orders, deliveries, receipts.
    Transactional,
    /// Default bucket when no rule matches.
    Promotional,
}

impl Category {
    /// Every category, in declaration order.
    pub const ALL: [Category; 6] = [
        Category::Otp,
        Category::Finance,
        Category::Offers,
        Category::Travel,
        Category::Transactional,
        Category::Promotional,
    ];

    /// Lower-case wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Otp => "otp",
            Self::Finance => "finance",
            Self::Offers => "offers",
            Self::Travel => "travel",
            Self::Transactional => "transactional",
            Self::Promotional => "promotional",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the six category names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category '{0}'")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == lower)
            .ok_or(UnknownCategory(s.to_owned()))
    }
}

/// A raw message as received from a forwarder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Sender address or short code.
    pub sender: String,
    /// Message text.
    pub body: String,
    /// Receive time; ingestion time is used when absent.
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    /// Identifier assigned by the forwarder, if any.
    #[serde(default)]
    pub message_id: Option<String>,
}

impl InboundMessage {
    /// Build an inbound message without timestamp or external id.
    pub fn new(sender: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            body: body.into(),
            timestamp: None,
            message_id: None,
        }
    }
}

/// A message after classification, extraction and threat detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedMessage {
    /// Sender address or short code.
    pub sender: String,
    /// Message text.
    pub body: String,
    /// Receive time.
    pub timestamp: DateTime<Utc>,
    /// Assigned category.
    pub category: Category,
    /// Whether any threat heuristic fired.
    pub is_threat: bool,
    /// `"; "`-joined threat reasons, absent when `is_threat` is false.
    pub threat_reason: Option<String>,
    /// URLs found in the body; absent rather than empty.
    pub urls: Option<Vec<String>>,
    /// Whether the body asks for money or urgent payment.
    pub has_money_request: bool,
    /// Whether the body carries a one-time code.
    pub has_otp: bool,
}

/// An enriched message as held by the external store.
///
/// `category` is optional because older records may predate classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredMessage {
    /// Store-assigned identifier.
    pub id: i64,
    /// Identifier assigned by the forwarder, if any.
    #[serde(default)]
    pub message_id: Option<String>,
    /// Sender address or short code.
    pub sender: String,
    /// Message text.
    pub body: String,
    /// Receive time.
    pub timestamp: DateTime<Utc>,
    /// Assigned category, if the record was classified.
    #[serde(default)]
    pub category: Option<Category>,
    /// Whether any threat heuristic fired.
    #[serde(default)]
    pub is_threat: bool,
    /// `"; "`-joined threat reasons.
    #[serde(default)]
    pub threat_reason: Option<String>,
    /// URLs found in the body.
    #[serde(default)]
    pub urls: Option<Vec<String>>,
    /// Whether the body asks for money or urgent payment.
    #[serde(default)]
    pub has_money_request: bool,
    /// Whether the body carries a one-time code.
    #[serde(default)]
    pub has_otp: bool,
}

impl StoredMessage {
    /// Wrap an enriched message with its store identifiers.
    pub fn from_enriched(id: i64, message_id: Option<String>, message: EnrichedMessage) -> Self {
        Self {
            id,
            message_id,
            sender: message.sender,
            body: message.body,
            timestamp: message.timestamp,
            category: Some(message.category),
            is_threat: message.is_threat,
            threat_reason: message.threat_reason,
            urls: message.urls,
            has_money_request: message.has_money_request,
            has_otp: message.has_otp,
        }
    }

    /// Category wire name, or `fallback` when the record has none.
    pub fn category_label<'a>(&self, fallback: &'a str) -> &'a str {
        match self.category {
            Some(category) => category.as_str(),
            None => fallback,
        }
    }
}
