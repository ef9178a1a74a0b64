//! URL grammar and OTP / money-request flags.

use smartsense::extractors::{extract_urls, has_money_request, has_otp, ExtractedEntities};

#[test]
fn urls_in_order_of_appearance() {
    let urls = extract_urls("first http://a.example/x then https://b.example/y?z=1 done");
    assert_eq!(urls, vec!["http://a.example/x", "https://b.example/y?z=1"]);
}

#[test]
fn trailing_sentence_punctuation_stays_attached() {
    assert_eq!(
        extract_urls("Visit https://example.com/path. Thanks"),
        vec!["https://example.com/path."]
    );
    assert_eq!(
        extract_urls("(see http://a.com/x)"),
        vec!["http://a.com/x)"]
    );
}

#[test]
fn quotes_and_whitespace_end_a_url() {
    assert_eq!(
        extract_urls("link: \"http://a.com/q\" here"),
        vec!["http://a.com/q"]
    );
}

#[test]
fn scheme_is_case_insensitive() {
    assert_eq!(extract_urls("GO TO HTTP://EXAMPLE.COM"), vec!["HTTP://EXAMPLE.COM"]);
}

#[test]
fn bare_domains_are_not_urls() {
    assert!(extract_urls("visit example.com or www.example.com").is_empty());
}

#[test]
fn otp_flag_matches_classifier_rule() {
    assert!(has_otp("Your OTP is 834921"));
    assert!(!has_otp("Call me at 5"));
}

#[test]
fn money_request_flag() {
    assert!(has_money_request("Transfer the amount immediately"));
    assert!(has_money_request("URGENT: make the payment immediately"));
    assert!(!has_money_request("Your order has shipped"));
}

#[test]
fn entities_report_absent_urls_as_none() {
    let entities = ExtractedEntities::from_body("Your OTP is 834921");
    assert!(entities.has_otp);
    assert!(!entities.has_money_request);
    assert_eq!(entities.urls_or_none(), None);

    let with_link = ExtractedEntities::from_body("see http://a.com");
    assert_eq!(with_link.urls_or_none(), Some(vec!["http://a.com".to_owned()]));
}
