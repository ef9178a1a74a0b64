//! Deterministic entity extraction from message bodies.
//!
//! Extractors never fail: a body with nothing interesting yields empty
//! results. The OTP and money-request checks reuse the exact compiled groups
//! the classifier and threat detector use, so the signals cannot drift.

pub mod entities;

pub use entities::{extract_urls, has_money_request, has_otp};

/// Everything the extractors find in one body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedEntities {
    /// URLs in order of appearance.
    pub urls: Vec<String>,
    /// Whether a money-request pattern matched.
    pub has_money_request: bool,
    /// Whether an OTP pattern matched.
    pub has_otp: bool,
}

impl ExtractedEntities {
    /// Run every extractor over `body`.
    pub fn from_body(body: &str) -> Self {
        Self {
            urls: extract_urls(body),
            has_money_request: has_money_request(body),
            has_otp: has_otp(body),
        }
    }

    /// URLs as stored: absent instead of empty.
    pub fn urls_or_none(&self) -> Option<Vec<String>> {
        if self.urls.is_empty() {
            None
        } else {
            Some(self.urls.clone())
        }
    }
}
