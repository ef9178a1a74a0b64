//! OpenRouter backend using the OpenAI-compatible `/chat/completions` API.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{check_http_response, CompletionRequest, ProviderError, TextCompletion};

/// Default OpenRouter chat completions endpoint.
pub const OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

// ---------------------------------------------------------------------------
// Wire types (pub for integration testing)
// ---------------------------------------------------------------------------

/// Chat completions request body.
#[doc(hidden)]
#[derive(Debug, Serialize)]
pub struct ChatRequest {
    /// Model identifier.
    pub model: String,
    /// Conversation messages.
    pub messages: Vec<ChatMessage>,
    /// Maximum completion tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Sampling temperature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// A message in chat format.
#[doc(hidden)]
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role (`user`, `assistant`, ...).
    pub role: String,
    /// Text content.
    pub content: Option<String>,
}

/// Chat completions response body.
#[doc(hidden)]
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    /// Response choices.
    pub choices: Vec<ChatChoice>,
}

/// A response choice.
#[doc(hidden)]
#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    /// Assistant message for this choice.
    pub message: ChatMessage,
}

// ---------------------------------------------------------------------------
// Backend
// ---------------------------------------------------------------------------

/// OpenRouter (or any OpenAI-compatible) chat completions backend.
#[derive(Clone)]
pub struct OpenRouterBackend {
    endpoint: String,
    api_key: String,
    referer: Option<String>,
    title: Option<String>,
    client: reqwest::Client,
}

impl std::fmt::Debug for OpenRouterBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenRouterBackend")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"[REDACTED]")
            .field("referer", &self.referer)
            .field("title", &self.title)
            .finish()
    }
}

impl OpenRouterBackend {
    /// Create a backend for `endpoint` authenticated with `api_key`.
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            referer: None,
            title: None,
            client: reqwest::Client::new(),
        }
    }

    /// Set the `HTTP-Referer` attribution header.
    pub fn with_referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = Some(referer.into());
        self
    }

    /// Set the `X-Title` attribution header.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

// ---------------------------------------------------------------------------
// Request / Response builders (pub for integration testing)
// ---------------------------------------------------------------------------

/// Build the wire request for a completion request.
#[doc(hidden)]
pub fn build_request(request: &CompletionRequest) -> ChatRequest {
    ChatRequest {
        model: request.model.clone(),
        messages: vec![ChatMessage {
            role: "user".to_owned(),
            content: Some(request.prompt.clone()),
        }],
        max_tokens: request.max_tokens,
        temperature: request.temperature,
    }
}

/// Extract the trimmed text of the first choice.
///
/// # Errors
///
/// Returns `ProviderError::Parse` if the body cannot be deserialized or the
/// first choice has no non-empty content.
#[doc(hidden)]
pub fn parse_response(body: &str) -> Result<String, ProviderError> {
    let resp: ChatResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::Parse(e.to_string()))?;

    let choice = resp
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::Parse("missing choices[0]".to_owned()))?;

    let text = choice.message.content.unwrap_or_default();
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ProviderError::Parse("empty completion content".to_owned()));
    }
    Ok(trimmed.to_owned())
}

fn map_send_error(err: reqwest::Error, timeout: Duration) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout(timeout)
    } else {
        ProviderError::Request(err)
    }
}

// ---------------------------------------------------------------------------
// Trait impl
// ---------------------------------------------------------------------------

#[async_trait::async_trait]
impl TextCompletion for OpenRouterBackend {
    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError> {
        let api_request = build_request(&request);

        let mut builder = self
            .client
            .post(&self.endpoint)
            .timeout(request.timeout)
            .header("content-type", "application/json")
            .header("authorization", format!("Bearer {}", self.api_key));
        if let Some(referer) = &self.referer {
            builder = builder.header("http-referer", referer);
        }
        if let Some(title) = &self.title {
            builder = builder.header("x-title", title);
        }

        let response = builder
            .json(&api_request)
            .send()
            .await
            .map_err(|e| map_send_error(e, request.timeout))?;

        let payload = check_http_response(&request.model, response)
            .await
            .map_err(|e| match e {
                ProviderError::Request(inner) => map_send_error(inner, request.timeout),
                other => other,
            })?;
        parse_response(&payload)
    }

    fn name(&self) -> &str {
        "openrouter"
    }
}
