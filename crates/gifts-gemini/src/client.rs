//! HTTP client for the Generative Language API.

use std::time::Duration;

use async_trait::async_trait;
use gifts_core::category::Category;
use gifts_core::narrative::{Narrative, NarrativeClient, NarrativeError};
use tracing::{debug, instrument};

use crate::wire::{GenerateContentRequest, GenerateContentResponse};

/// Longest error body kept in a `NarrativeError::Status`.
const MAX_ERROR_BODY: usize = 512;

/// Connection settings for the Gemini API.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key sent as `x-goog-api-key`.
    pub api_key: String,
    /// Model name, e.g. `gemini-2.5-flash`.
    pub model: String,
    /// Scheme and host, without a trailing path.
    pub base_url: String,
    /// Whole-request timeout.
    pub timeout: Duration,
}

impl GeminiConfig {
    /// Default model.
    pub const DEFAULT_MODEL: &'static str = "gemini-2.5-flash";
    /// Default API host.
    pub const DEFAULT_BASE_URL: &'static str = "https://generativelanguage.googleapis.com";
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Settings with the default model, host and timeout.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: Self::DEFAULT_MODEL.to_owned(),
            base_url: Self::DEFAULT_BASE_URL.to_owned(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }
}

/// `NarrativeClient` backed by `generateContent` with structured output.
#[derive(Debug, Clone)]
pub struct GeminiNarrativeClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl GeminiNarrativeClient {
    /// Builds a client for `config`.
    ///
    /// # Errors
    ///
    /// Returns `NarrativeError::Transport` if the HTTP client cannot be built.
    pub fn new(config: GeminiConfig) -> Result<Self, NarrativeError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| NarrativeError::Transport(e.to_string()))?;
        let endpoint = format!(
            "{}/v1beta/models/{}:generateContent",
            config.base_url.trim_end_matches('/'),
            config.model
        );
        Ok(Self {
            http,
            endpoint,
            api_key: config.api_key,
        })
    }

    /// Full URL requests are posted to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn truncate(mut body: String) -> String {
    if body.len() > MAX_ERROR_BODY {
        let mut cut = MAX_ERROR_BODY;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
    }
    body
}

#[async_trait]
impl NarrativeClient for GeminiNarrativeClient {
    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    async fn analyze(&self, category: Category) -> Result<Narrative, NarrativeError> {
        let request = GenerateContentRequest::for_category(category);

        let response = self
            .http
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| NarrativeError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NarrativeError::Status {
                status: status.as_u16(),
                body: truncate(body),
            });
        }

        let envelope: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| NarrativeError::Malformed(format!("response envelope: {e}")))?;
        let text = envelope.first_text().unwrap_or("{}");
        debug!(bytes = text.len(), "narrative generated");

        serde_json::from_str(text)
            .map_err(|e| NarrativeError::Malformed(format!("narrative payload: {e}")))
    }
}
