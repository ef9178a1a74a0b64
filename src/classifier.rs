//! Rule-based message classifier.
//!
//! Every body gets exactly one [`Category`]:
//! 1. any OTP pattern match returns [`Category::Otp`] immediately;
//! 2. otherwise each remaining category scores the number of its distinct
//!    patterns that match;
//! 3. the highest score wins, ties going to the category declared first in
//!    [`crate::rules::patterns::CATEGORY_PATTERNS`];
//! 4. all-zero scores fall back to [`Category::Promotional`].

use crate::rules::RuleSet;
use crate::types::Category;

/// Classify a message body.
pub fn classify(body: &str) -> Category {
    classify_with(RuleSet::builtin(), body)
}

/// Classify against an explicit rule set.
pub fn classify_with(rules: &RuleSet, body: &str) -> Category {
    let lower = body.to_lowercase();

    if rules.otp.any_match(&lower) {
        return Category::Otp;
    }

    let mut best: Option<(Category, usize)> = None;
    for (category, group) in &rules.categories {
        let score = group.score(&lower);
        if score == 0 {
            continue;
        }
        // Strictly greater keeps the earlier category on ties.
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((*category, score));
        }
    }

    best.map_or(Category::Promotional, |(category, _)| category)
}

/// Per-category scores in declaration order, OTP first (0 or 1).
///
/// Diagnostic companion to [`classify`]; the first entry with the highest
/// score is the one `classify` would pick, except that a nonzero OTP score
/// always wins.
pub fn category_scores(body: &str) -> Vec<(Category, usize)> {
    let rules = RuleSet::builtin();
    let lower = body.to_lowercase();

    let otp = usize::from(rules.otp.any_match(&lower));
    std::iter::once((Category::Otp, otp))
        .chain(
            rules
                .categories
                .iter()
                .map(|(category, group)| (*category, group.score(&lower))),
        )
        .collect()
}
