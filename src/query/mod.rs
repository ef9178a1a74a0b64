//! Free-text questions about a message set.
//!
//! [`QueryAnswerer`] first walks the configured fallback tiers (remote model
//! ids) in order, one attempt each, stopping at the first success. When no
//! backend is configured, every tier fails, or the caller cancels, it answers
//! with the deterministic rules in [`fallback`]. Callers never see an error.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::{Config, QueryConfig};
use crate::credentials::{resolve_api_key, Credentials};
use crate::digest::{category_summary, digest, Digest};
use crate::providers::openrouter::OpenRouterBackend;
use crate::providers::{CompletionRequest, ProviderError, TextCompletion};
use crate::types::StoredMessage;

pub mod context;
pub mod fallback;
pub mod state;

use context::{build_context, build_query_prompt, build_summary_prompt};
use fallback::rule_based_answer;
use state::{initial_state, next_state, AnswerState, AttemptOutcome};

/// Default per-attempt remote timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default number of source ids returned with an answer.
pub const DEFAULT_MAX_SOURCES: usize = 5;

/// Token cap for one-line category summaries.
const SUMMARY_MAX_TOKENS: u32 = 50;

/// Sampling temperature for one-line category summaries.
const SUMMARY_TEMPERATURE: f32 = 0.5;

/// Which path produced an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnswerMode {
    /// A remote backend answered.
    Remote {
        /// Tier (model id) that answered.
        model: String,
    },
    /// The deterministic rule engine answered.
    RuleBased,
}

/// Answer text plus the message ids it was drawn from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryAnswer {
    /// Answer text.
    pub answer: String,
    /// Leading ids of the input (five by default), in input order.
    pub sources: Vec<i64>,
    /// Which path produced the answer.
    pub mode: AnswerMode,
}

/// Tunables for remote attempts and context building.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswererSettings {
    /// Timeout for each remote attempt.
    pub timeout: Duration,
    /// Messages included in the remote context.
    pub context_messages: usize,
    /// Body characters per message in the remote context.
    pub body_preview_chars: usize,
    /// Source ids returned with an answer.
    pub max_sources: usize,
}

impl Default for AnswererSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            context_messages: context::DEFAULT_CONTEXT_MESSAGES,
            body_preview_chars: context::DEFAULT_BODY_PREVIEW_CHARS,
            max_sources: DEFAULT_MAX_SOURCES,
        }
    }
}

impl From<&QueryConfig> for AnswererSettings {
    fn from(config: &QueryConfig) -> Self {
        Self {
            timeout: Duration::from_secs(config.timeout_secs),
            context_messages: config.context_messages,
            body_preview_chars: config.body_preview_chars,
            max_sources: config.max_sources,
        }
    }
}

/// Remote-first, rule-based-fallback question answering.
#[derive(Clone)]
pub struct QueryAnswerer {
    backend: Option<Arc<dyn TextCompletion>>,
    tiers: Vec<String>,
    settings: AnswererSettings,
}

impl std::fmt::Debug for QueryAnswerer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryAnswerer")
            .field("backend", &self.backend.as_ref().map(|b| b.name().to_owned()))
            .field("tiers", &self.tiers)
            .field("settings", &self.settings)
            .finish()
    }
}

impl QueryAnswerer {
    /// Answerer with remote tiers tried in the given order.
    pub fn new(backend: Arc<dyn TextCompletion>, tiers: Vec<String>) -> Self {
        Self {
            backend: Some(backend),
            tiers,
            settings: AnswererSettings::default(),
        }
    }

    /// Answerer that never makes a remote call.
    pub fn rule_based() -> Self {
        Self {
            backend: None,
            tiers: Vec::new(),
            settings: AnswererSettings::default(),
        }
    }

    /// Build from configuration. Without an API key the answerer is rule-based.
    pub fn from_config(config: &Config, credentials: &Credentials) -> Self {
        let settings = AnswererSettings::from(&config.query);
        match resolve_api_key(credentials, &config.models.api_key_env) {
            Some(api_key) => {
                let mut backend = OpenRouterBackend::new(config.models.base_url.clone(), api_key)
                    .with_title(config.models.title.clone());
                if let Some(referer) = &config.models.referer {
                    backend = backend.with_referer(referer.clone());
                }
                info!(
                    endpoint = %config.models.base_url,
                    tiers = config.models.fallback.len(),
                    "remote answering enabled"
                );
                Self::new(Arc::new(backend), config.models.fallback.clone()).with_settings(settings)
            }
            None => {
                info!(
                    key = %config.models.api_key_env,
                    "API key not configured, using rule-based answers"
                );
                Self::rule_based().with_settings(settings)
            }
        }
    }

    /// Replace the tunables.
    pub fn with_settings(mut self, settings: AnswererSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Whether a remote backend is configured.
    pub fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    /// Answer `query` about `messages`.
    pub async fn answer(&self, query: &str, messages: &[StoredMessage]) -> QueryAnswer {
        self.answer_or_cancel(query, messages, std::future::pending())
            .await
    }

    /// Like [`answer`](Self::answer), but gives up on the remote phase after
    /// `deadline` and answers with the rules.
    pub async fn answer_within(
        &self,
        query: &str,
        messages: &[StoredMessage],
        deadline: Duration,
    ) -> QueryAnswer {
        self.answer_or_cancel(query, messages, tokio::time::sleep(deadline))
            .await
    }

    /// Like [`answer`](Self::answer), but drops the in-flight remote attempt
    /// as soon as `cancel` resolves and answers with the rules.
    pub async fn answer_or_cancel<F>(
        &self,
        query: &str,
        messages: &[StoredMessage],
        cancel: F,
    ) -> QueryAnswer
    where
        F: Future<Output = ()>,
    {
        debug!(query, messages = messages.len(), "answering query");

        let remote = if self.has_backend() {
            let context = build_context(
                messages,
                self.settings.context_messages,
                self.settings.body_preview_chars,
            );
            let prompt = build_query_prompt(query, &context);
            tokio::select! {
                remote = self.run_tiers(&prompt, None, None) => remote,
                () = cancel => {
                    warn!("remote answering cancelled, using rule-based answer");
                    None
                }
            }
        } else {
            None
        };

        let (answer, mode) = match remote {
            Some((model, text)) => (text, AnswerMode::Remote { model }),
            None => (rule_based_answer(query, messages), AnswerMode::RuleBased),
        };

        QueryAnswer {
            answer,
            sources: messages
                .iter()
                .take(self.settings.max_sources)
                .map(|m| m.id)
                .collect(),
            mode,
        }
    }

    /// One-line summary of a category's messages.
    ///
    /// Asks the tiers in order; falls back to the digest template.
    pub async fn summarize_category(&self, category: &str, messages: &[StoredMessage]) -> String {
        let template = category_summary(category, messages.len());
        if messages.is_empty() || !self.has_backend() {
            return template;
        }
        let prompt = build_summary_prompt(category, messages);
        match self
            .run_tiers(&prompt, Some(SUMMARY_MAX_TOKENS), Some(SUMMARY_TEMPERATURE))
            .await
        {
            Some((_, text)) => text,
            None => template,
        }
    }

    /// Digest whose summaries are written by the remote tiers where possible.
    pub async fn abstractive_digest(&self, messages: &[StoredMessage], date_label: &str) -> Digest {
        let mut result = digest(messages, date_label);
        if !self.has_backend() {
            return result;
        }
        for entry in &mut result.categories {
            let members: Vec<StoredMessage> = messages
                .iter()
                .filter(|m| m.category_label(crate::digest::UNCATEGORIZED) == entry.category)
                .cloned()
                .collect();
            entry.summary = self.summarize_category(&entry.category, &members).await;
        }
        result
    }

    /// Walk the tiers with the fallback state machine.
    ///
    /// Each attempt is cut off after `settings.timeout`; a late reply counts
    /// as a failure.
    ///
    /// Returns `(model, text)` from the first success, `None` once the
    /// machine reaches `RuleBased`.
    async fn run_tiers(
        &self,
        prompt: &str,
        max_tokens: Option<u32>,
        temperature: Option<f32>,
    ) -> Option<(String, String)> {
        let tier_count = self.tiers.len();
        let mut state = initial_state(self.has_backend(), tier_count);
        let backend = self.backend.as_ref()?;
        let mut answer = None;

        while let AnswerState::TryBackend(index) = state {
            let Some(model) = self.tiers.get(index) else {
                break;
            };
            if index > 0 {
                info!(tier = index, model = %model, "trying fallback model");
            }

            let request = CompletionRequest {
                model: model.clone(),
                prompt: prompt.to_owned(),
                max_tokens,
                temperature,
                timeout: self.settings.timeout,
            };
            let attempt = tokio::time::timeout(self.settings.timeout, backend.complete(request))
                .await
                .unwrap_or(Err(ProviderError::Timeout(self.settings.timeout)));
            let outcome = match attempt {
                Ok(text) => {
                    info!(model = %model, "model responded");
                    answer = Some((model.clone(), text));
                    AttemptOutcome::Success
                }
                Err(e) if e.is_rate_limited() => {
                    info!(model = %model, "model is rate limited");
                    AttemptOutcome::RateLimited
                }
                Err(e) => {
                    warn!(model = %model, error = %e, "model request failed");
                    AttemptOutcome::Failed
                }
            };
            state = next_state(state, tier_count, Some(outcome));
        }

        if answer.is_none() {
            info!("all remote models unavailable, using rule-based answer");
        }
        answer
    }
}
