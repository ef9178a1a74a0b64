//! SmartSense: SMS classification, threat detection, digests and inbox Q&A.
//!
//! Incoming messages go through [`processor::process`], which classifies the
//! body, extracts URLs / OTP / money-request signals and flags threats using
//! fixed rule tables. Stored messages feed [`digest::digest`] for per-day
//! summaries and [`query::QueryAnswerer`] for free-text questions, which
//! tries remote models in order before falling back to deterministic rules.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod credentials;
pub mod logging;

pub mod classifier;
pub mod digest;
pub mod extractors;
pub mod inbox;
pub mod processor;
pub mod providers;
pub mod query;
pub mod rules;
pub mod threat;
pub mod types;
