//! Deterministic keyword answers.

use chrono::{TimeZone, Utc};

use smartsense::query::fallback::{category_breakdown, rule_based_answer};
use smartsense::types::{Category, StoredMessage};

fn stored(id: i64, category: Option<Category>, body: &str) -> StoredMessage {
    StoredMessage {
        id,
        message_id: None,
        sender: format!("SENDER{id}"),
        body: body.to_owned(),
        timestamp: Utc
            .with_ymd_and_hms(2025, 1, 2, 10, 0, 0)
            .single()
            .expect("valid timestamp"),
        category,
        is_threat: false,
        threat_reason: None,
        urls: None,
        has_money_request: false,
        has_otp: category == Some(Category::Otp),
    }
}

fn inbox() -> Vec<StoredMessage> {
    let mut threat = stored(4, Some(Category::Finance), "account suspended");
    threat.is_threat = true;
    threat.threat_reason = Some("Possible account impersonation or phishing".to_owned());
    vec![
        stored(1, Some(Category::Offers), "50% off"),
        stored(2, Some(Category::Otp), "Your OTP is 834921"),
        stored(3, Some(Category::Offers), "coupon inside"),
        threat,
        stored(5, Some(Category::Offers), "cashback"),
        stored(6, None, "legacy"),
    ]
}

#[test]
fn counts_by_keyword() {
    let messages = inbox();
    assert_eq!(
        rule_based_answer("how many offers", &messages),
        "You have 3 offer messages."
    );
    assert_eq!(
        rule_based_answer("How many OTPs did I get?", &messages),
        "You have 1 OTP messages."
    );
    assert_eq!(
        rule_based_answer("number of bank messages", &messages),
        "You have 1 banking messages."
    );
    assert_eq!(
        rule_based_answer("count scams", &messages),
        "You have 1 potential threat messages flagged."
    );
    assert_eq!(
        rule_based_answer("how many messages", &messages),
        "You have 6 total messages."
    );
}

#[test]
fn lists_otps() {
    let answer = rule_based_answer("show OTPs", &inbox());
    assert_eq!(answer, "Recent OTP messages:\n- From SENDER2: Your OTP is 834921\n");
}

#[test]
fn lists_threats_with_reasons() {
    let answer = rule_based_answer("list threats", &inbox());
    assert_eq!(
        answer,
        "Flagged threat messages:\n- From SENDER4: Possible account impersonation or phishing\n"
    );
}

#[test]
fn threat_without_stored_reason_is_still_listed() {
    let mut threat = stored(9, Some(Category::Finance), "verify your account");
    threat.is_threat = true;
    let answer = rule_based_answer("list threats", &[threat]);
    assert_eq!(
        answer,
        "Flagged threat messages:\n- From SENDER9: no reason recorded\n"
    );
}

#[test]
fn empty_lists_have_fixed_answers() {
    let messages = vec![stored(1, Some(Category::Offers), "sale")];
    assert_eq!(rule_based_answer("show otp", &messages), "No OTP messages found.");
    assert_eq!(rule_based_answer("list threats", &messages), "No threats detected.");
}

#[test]
fn summary_uses_descending_breakdown() {
    assert_eq!(
        rule_based_answer("summarize today", &inbox()),
        "Summary: 3 offers, 1 otp, 1 finance, 1 other"
    );
}

#[test]
fn breakdown_labels_missing_category_as_other() {
    let breakdown = category_breakdown(&inbox());
    assert_eq!(breakdown.first(), Some(&("offers", 3)));
    assert!(breakdown.contains(&("other", 1)));
}

#[test]
fn unrecognized_query_gets_usage_hint() {
    assert_eq!(
        rule_based_answer("hello", &[]),
        "I found 0 messages. Try asking 'how many offers' or 'show OTPs' or 'summarize today'."
    );
}
