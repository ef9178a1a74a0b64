//! URL, OTP and money-request extraction.

use crate::rules::RuleSet;

/// All `http(s)://` URLs in `body`, in order of appearance.
///
/// See [`crate::rules::patterns::URL_PATTERN`] for the accepted characters.
/// Trailing punctuation inside that class (`.`, `)`, `,`) stays attached.
pub fn extract_urls(body: &str) -> Vec<String> {
    RuleSet::builtin().url.find_all(body)
}

/// True when any money-request pattern matches.
pub fn has_money_request(body: &str) -> bool {
    RuleSet::builtin()
        .money_request
        .any_match(&body.to_lowercase())
}

/// True when any OTP pattern matches.
pub fn has_otp(body: &str) -> bool {
    RuleSet::builtin().otp.any_match(&body.to_lowercase())
}
