//! Compiled rule tables.
//!
//! The raw pattern strings live in [`patterns`]; this module compiles them
//! once into a [`RuleSet`] shared by the classifier, entity extractor and
//! threat detector. Body groups are case-insensitive; sender patterns are
//! case-sensitive.

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};
use tracing::warn;

use crate::types::Category;

pub mod patterns;

static BUILTIN: LazyLock<RuleSet> = LazyLock::new(RuleSet::compile);

/// An ordered list of compiled patterns.
#[derive(Debug, Clone)]
pub struct PatternGroup {
    regexes: Vec<Regex>,
}

impl PatternGroup {
    fn case_insensitive(sources: &[&str]) -> Self {
        Self::build(sources, true)
    }

    fn case_sensitive(sources: &[&str]) -> Self {
        Self::build(sources, false)
    }

    fn build(sources: &[&str], ignore_case: bool) -> Self {
        let regexes = sources
            .iter()
            .filter_map(|source| {
                match RegexBuilder::new(source)
                    .case_insensitive(ignore_case)
                    .build()
                {
                    Ok(regex) => Some(regex),
                    Err(e) => {
                        warn!(pattern = %source, error = %e, "skipping invalid rule pattern");
                        None
                    }
                }
            })
            .collect();
        Self { regexes }
    }

    /// True when any pattern finds a match in `text`.
    pub fn any_match(&self, text: &str) -> bool {
        self.regexes.iter().any(|regex| regex.is_match(text))
    }

    /// Number of distinct patterns that match `text` at least once.
    pub fn score(&self, text: &str) -> usize {
        self.regexes
            .iter()
            .filter(|regex| regex.is_match(text))
            .count()
    }

    /// Every non-overlapping match of every pattern, in pattern then position order.
    pub fn find_all(&self, text: &str) -> Vec<String> {
        self.regexes
            .iter()
            .flat_map(|regex| regex.find_iter(text).map(|m| m.as_str().to_owned()))
            .collect()
    }

    /// Number of compiled patterns.
    pub fn len(&self) -> usize {
        self.regexes.len()
    }

    /// True when the group has no compiled patterns.
    pub fn is_empty(&self) -> bool {
        self.regexes.is_empty()
    }
}

/// Every rule group, compiled.
#[derive(Debug, Clone)]
pub struct RuleSet {
    /// One-time-code group; shared by classification and `has_otp`.
    pub otp: PatternGroup,
    /// Scored category groups in tie-break order.
    pub categories: Vec<(Category, PatternGroup)>,
    /// Shortener and generic URL patterns, applied to extracted URLs.
    pub suspicious_links: PatternGroup,
    /// Money request group; shared by threat detection and `has_money_request`.
    pub money_request: PatternGroup,
    /// Impersonation / phishing group.
    pub impersonation: PatternGroup,
    /// Sender-shape patterns.
    pub suspicious_senders: PatternGroup,
    /// URL extraction grammar.
    pub url: PatternGroup,
}

impl RuleSet {
    /// The process-wide compiled tables.
    pub fn builtin() -> &'static RuleSet {
        &BUILTIN
    }

    fn compile() -> Self {
        let categories = patterns::CATEGORY_PATTERNS
            .iter()
            .map(|(category, sources)| (*category, PatternGroup::case_insensitive(sources)))
            .collect();

        Self {
            otp: PatternGroup::case_insensitive(patterns::OTP_PATTERNS),
            categories,
            suspicious_links: PatternGroup::case_insensitive(patterns::SUSPICIOUS_LINK_PATTERNS),
            money_request: PatternGroup::case_insensitive(patterns::MONEY_REQUEST_PATTERNS),
            impersonation: PatternGroup::case_insensitive(patterns::IMPERSONATION_PATTERNS),
            suspicious_senders: PatternGroup::case_sensitive(patterns::SUSPICIOUS_SENDER_PATTERNS),
            url: PatternGroup::case_sensitive(&[patterns::URL_PATTERN]),
        }
    }
}
