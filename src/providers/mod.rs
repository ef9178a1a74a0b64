//! Remote text-completion layer.
//!
//! Defines the [`TextCompletion`] trait the query answerer talks to, the
//! shared request type and [`ProviderError`]. The only concrete backend is
//! [`openrouter::OpenRouterBackend`]; tests substitute scripted fakes.

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;

pub mod openrouter;

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// A single-prompt completion request addressed to one model.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Backend model identifier (e.g. `"deepseek/deepseek-r1:free"`).
    pub model: String,
    /// Full user prompt.
    pub prompt: String,
    /// Maximum tokens in the response.
    pub max_tokens: Option<u32>,
    /// Sampling temperature.
    pub temperature: Option<f32>,
    /// Upper bound for the whole request.
    pub timeout: Duration,
}

impl CompletionRequest {
    /// Build a request with no token or temperature overrides.
    pub fn new(model: impl Into<String>, prompt: impl Into<String>, timeout: Duration) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            max_tokens: None,
            temperature: None,
            timeout,
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors returned by completion backends.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// HTTP transport failure.
    #[error("provider request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The request did not finish within its timeout.
    #[error("provider request timed out after {0:?}")]
    Timeout(Duration),
    /// Upstream is rate limiting this model.
    #[error("model '{model}' is rate limited")]
    RateLimited {
        /// Rate-limited model.
        model: String,
    },
    /// Response did not match expected schema.
    #[error("provider response parse error: {0}")]
    Parse(String),
    /// Upstream provider responded with an error status.
    #[error("provider returned non-success status {status}: {body}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Redacted, truncated response body.
        body: String,
    },
}

impl ProviderError {
    /// Whether this error is the rate-limited status.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }
}

// ---------------------------------------------------------------------------
// HTTP helpers
// ---------------------------------------------------------------------------

/// Check HTTP response status and return body text or a structured error.
///
/// # Errors
///
/// Returns `ProviderError::Request` on transport failure,
/// `ProviderError::RateLimited` on 429 and `ProviderError::HttpStatus` on
/// any other non-2xx status.
pub async fn check_http_response(
    model: &str,
    response: reqwest::Response,
) -> Result<String, ProviderError> {
    let status = response.status();
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(ProviderError::RateLimited {
            model: model.to_owned(),
        });
    }
    let body = response.text().await?;
    if !status.is_success() {
        return Err(ProviderError::HttpStatus {
            status: status.as_u16(),
            body: sanitize_http_error_body(&body),
        });
    }
    Ok(body)
}

/// Characters of an upstream error body kept in [`ProviderError::HttpStatus`].
const ERROR_BODY_LIMIT: usize = 200;

/// API key and bearer token shapes scrubbed from upstream error bodies.
static SECRET_SHAPES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"sk-or-v1-[A-Za-z0-9]{16,}",
        r"sk-[A-Za-z0-9_\-]{32,}",
        r"Bearer\s+[A-Za-z0-9._\-]{16,}",
    ]
    .into_iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
});

/// Single-line, secret-free, length-capped copy of an error body.
fn sanitize_http_error_body(raw: &str) -> String {
    let flattened = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let scrubbed = SECRET_SHAPES.iter().fold(flattened, |text, shape| {
        shape.replace_all(&text, "[REDACTED]").into_owned()
    });
    match scrubbed.char_indices().nth(ERROR_BODY_LIMIT) {
        Some((cut, _)) => format!("{}...[truncated]", &scrubbed[..cut]),
        None => scrubbed,
    }
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// A remote capability that turns a prompt into text.
///
/// Implementations must honour `request.timeout` and report HTTP 429 as
/// [`ProviderError::RateLimited`]; the query answerer treats every other
/// error the same way.
#[async_trait]
pub trait TextCompletion: Send + Sync {
    /// Complete `request.prompt` with `request.model`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] on transport, status, timeout or parse failure.
    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError>;

    /// Short backend name for logs.
    fn name(&self) -> &str;
}
