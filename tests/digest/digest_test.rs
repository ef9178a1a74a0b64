//! Digest grouping, ordering and summaries.

use chrono::{DateTime, TimeZone, Utc};

use smartsense::digest::{category_summary, digest};
use smartsense::types::{Category, StoredMessage};

fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 2, hour, 0, 0)
        .single()
        .expect("valid timestamp")
}

fn stored(id: i64, category: Option<Category>, is_threat: bool) -> StoredMessage {
    StoredMessage {
        id,
        message_id: None,
        sender: "HDFCBK".to_owned(),
        body: format!("message {id}"),
        timestamp: at(10),
        category,
        is_threat,
        threat_reason: is_threat.then(|| "Suspicious sender ID".to_owned()),
        urls: None,
        has_money_request: false,
        has_otp: false,
    }
}

#[test]
fn empty_set_yields_empty_digest() {
    let result = digest(&[], "2025-01-02");
    assert_eq!(result.date, "2025-01-02");
    assert_eq!(result.total_messages, 0);
    assert!(result.categories.is_empty());
    assert_eq!(result.threat_count, 0);
}

#[test]
fn categories_sorted_by_count_with_first_seen_ties() {
    let messages = vec![
        stored(1, Some(Category::Finance), false),
        stored(2, Some(Category::Otp), false),
        stored(3, Some(Category::Offers), true),
        stored(4, Some(Category::Offers), false),
        stored(5, Some(Category::Otp), false),
        stored(6, Some(Category::Offers), true),
        stored(7, None, false),
    ];
    let result = digest(&messages, "2025-01-02");

    let order: Vec<(&str, usize)> = result
        .categories
        .iter()
        .map(|entry| (entry.category.as_str(), entry.count))
        .collect();
    assert_eq!(
        order,
        vec![("offers", 3), ("otp", 2), ("finance", 1), ("uncategorized", 1)]
    );
    assert_eq!(result.total_messages, 7);
    assert_eq!(result.threat_count, 2);

    let summed: usize = result.categories.iter().map(|entry| entry.count).sum();
    assert_eq!(summed, result.total_messages);
}

#[test]
fn finance_and_otp_day() {
    let mut messages: Vec<StoredMessage> = (1..=5_i64)
        .map(|id| stored(id, Some(Category::Finance), id == 3))
        .collect();
    messages.push(stored(6, Some(Category::Otp), false));
    messages.push(stored(7, Some(Category::Otp), false));

    let result = digest(&messages, "2025-01-02");

    let order: Vec<(&str, usize)> = result
        .categories
        .iter()
        .map(|entry| (entry.category.as_str(), entry.count))
        .collect();
    assert_eq!(order, vec![("finance", 5), ("otp", 2)]);
    assert_eq!(result.total_messages, 7);
    assert_eq!(result.threat_count, 1);
    assert_eq!(result.categories[0].summary, "5 banking and financial updates");
    assert_eq!(result.categories[1].summary, "2 OTP and verification codes");
}

#[test]
fn entries_use_templated_summaries() {
    let messages = vec![
        stored(1, Some(Category::Offers), false),
        stored(2, Some(Category::Offers), false),
    ];
    let result = digest(&messages, "2025-01-02");
    assert_eq!(result.categories[0].summary, "2 promotional offers and deals");
}

#[test]
fn summary_templates() {
    assert_eq!(category_summary("finance", 1), "1 banking and financial updates");
    assert_eq!(category_summary("travel", 2), "2 travel and booking confirmations");
    assert_eq!(category_summary("otp", 3), "3 OTP and verification codes");
    assert_eq!(category_summary("transactional", 4), "4 order and delivery updates");
    assert_eq!(category_summary("promotional", 5), "5 promotional messages");
    assert_eq!(category_summary("uncategorized", 6), "6 uncategorized messages");
}

#[test]
fn digest_serializes_with_wire_field_names() {
    let result = digest(&[stored(1, Some(Category::Travel), false)], "2025-01-02");
    let json = serde_json::to_value(&result).expect("serialize digest");
    assert_eq!(json["total_messages"], 1);
    assert_eq!(json["threat_count"], 0);
    assert_eq!(json["categories"][0]["category"], "travel");
}
