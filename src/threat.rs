//! Threat detection over sender shape, body phrasing and extracted URLs.
//!
//! Pure rule evaluation: no I/O, no learning, never fails. Each reason is
//! reported at most once, in the fixed order of [`ThreatReason::ORDER`].

use std::fmt;

use crate::extractors::extract_urls;
use crate::rules::RuleSet;

/// A threat heuristic that fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThreatReason {
    /// A URL matched a shortener or the generic URL catch-all.
    SuspiciousLink,
    /// The body asks for money or urgent payment.
    MoneyRequest,
    /// The body uses account-suspended or verify-details phrasing.
    Impersonation,
    /// The sender ID looks generated.
    SuspiciousSender,
}

impl ThreatReason {
    /// Evaluation and reporting order.
    pub const ORDER: [ThreatReason; 4] = [
        ThreatReason::SuspiciousLink,
        ThreatReason::MoneyRequest,
        ThreatReason::Impersonation,
        ThreatReason::SuspiciousSender,
    ];

    /// Human-readable reason text.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SuspiciousLink => "Contains suspicious shortened URL",
            Self::MoneyRequest => "Requests money transfer or urgent payment",
            Self::Impersonation => "Possible account impersonation or phishing",
            Self::SuspiciousSender => "Suspicious sender ID",
        }
    }
}

impl fmt::Display for ThreatReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of running every threat heuristic over one message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThreatAssessment {
    reasons: Vec<ThreatReason>,
}

impl ThreatAssessment {
    /// Reasons in discovery order, without duplicates.
    pub fn reasons(&self) -> &[ThreatReason] {
        &self.reasons
    }

    /// Whether any heuristic fired.
    pub fn is_threat(&self) -> bool {
        !self.reasons.is_empty()
    }

    /// Reasons joined with `"; "`, or `None` when nothing fired.
    pub fn reason_text(&self) -> Option<String> {
        if self.reasons.is_empty() {
            return None;
        }
        let parts: Vec<&str> = self.reasons.iter().map(|r| r.as_str()).collect();
        Some(parts.join("; "))
    }

    fn push(&mut self, reason: ThreatReason) {
        if !self.reasons.contains(&reason) {
            self.reasons.push(reason);
        }
    }
}

/// Run every heuristic and return the typed assessment.
pub fn assess(sender: &str, body: &str) -> ThreatAssessment {
    let rules = RuleSet::builtin();
    let lower = body.to_lowercase();
    let mut assessment = ThreatAssessment::default();

    for url in extract_urls(body) {
        if rules.suspicious_links.any_match(&url) {
            assessment.push(ThreatReason::SuspiciousLink);
        }
    }

    if rules.money_request.any_match(&lower) {
        assessment.push(ThreatReason::MoneyRequest);
    }

    if rules.impersonation.any_match(&lower) {
        assessment.push(ThreatReason::Impersonation);
    }

    if rules.suspicious_senders.any_match(sender) {
        assessment.push(ThreatReason::SuspiciousSender);
    }

    assessment
}

/// `(is_threat, reason)` for a message.
pub fn detect_threat(sender: &str, body: &str) -> (bool, Option<String>) {
    let assessment = assess(sender, body);
    (assessment.is_threat(), assessment.reason_text())
}
