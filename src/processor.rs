//! Message processor: inbound text to enriched record.
//!
//! Classification, extraction and threat detection are independent pure
//! functions of `(sender, body)`; the processor only assembles their results.
//! There is no error path. Unrecognisable input becomes a non-threatening
//! `promotional` message.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::classifier::classify;
use crate::extractors::ExtractedEntities;
use crate::threat::assess;
use crate::types::{EnrichedMessage, InboundMessage, StoredMessage};

/// Enrich one message. `timestamp` defaults to now.
pub fn process(sender: &str, body: &str, timestamp: Option<DateTime<Utc>>) -> EnrichedMessage {
    let timestamp = timestamp.unwrap_or_else(Utc::now);
    let category = classify(body);
    let entities = ExtractedEntities::from_body(body);
    let threat = assess(sender, body);

    debug!(
        sender,
        category = %category,
        is_threat = threat.is_threat(),
        urls = entities.urls.len(),
        "message processed"
    );

    EnrichedMessage {
        sender: sender.to_owned(),
        body: body.to_owned(),
        timestamp,
        category,
        is_threat: threat.is_threat(),
        threat_reason: threat.reason_text(),
        urls: entities.urls_or_none(),
        has_money_request: entities.has_money_request,
        has_otp: entities.has_otp,
    }
}

/// Enrich an [`InboundMessage`].
pub fn process_inbound(message: &InboundMessage) -> EnrichedMessage {
    process(&message.sender, &message.body, message.timestamp)
}

/// Enrich a batch, one record per input in input order.
pub fn process_batch(messages: &[InboundMessage]) -> Vec<EnrichedMessage> {
    messages.iter().map(process_inbound).collect()
}

/// Enrich a batch and assign sequential store ids starting at `first_id`.
///
/// This is the bulk-import path: each message keeps its forwarder id.
pub fn import_batch(messages: &[InboundMessage], first_id: i64) -> Vec<StoredMessage> {
    let mut next_id = first_id;
    messages
        .iter()
        .map(|inbound| {
            let id = next_id;
            next_id = next_id.saturating_add(1);
            StoredMessage::from_enriched(id, inbound.message_id.clone(), process_inbound(inbound))
        })
        .collect()
}
