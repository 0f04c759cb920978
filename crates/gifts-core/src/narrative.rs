//! Narrative enrichment port.
//!
//! The Coach view asks an external text-generation service for a short
//! write-up about a single category. Adapters implement
//! [`NarrativeClient`]; callers go through [`fetch_narrative`], which never
//! fails and substitutes [`Narrative::fallback`] for any error.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::category::Category;

/// Structured narrative returned for a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Narrative {
    /// What the gift looks like in maturity.
    pub summary: String,
    /// Biblical characters who exemplified the gift (three expected).
    pub biblical_role_models: Vec<String>,
    /// Common weaknesses or temptations (three expected).
    pub potential_pitfalls: Vec<String>,
    /// An actionable plan for the coming week.
    pub growth_plan: String,
}

impl Narrative {
    /// The fixed payload shown when enrichment is unavailable.
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            summary: "Analysis unavailable.".to_owned(),
            biblical_role_models: vec!["Unavailable".to_owned()],
            potential_pitfalls: vec!["Unavailable".to_owned()],
            growth_plan: "Please try again later.".to_owned(),
        }
    }
}

/// Failure talking to the text-generation service.
#[derive(Debug, Error)]
pub enum NarrativeError {
    /// The request could not be sent or the connection failed.
    #[error("narrative request failed: {0}")]
    Transport(String),

    /// The service answered with a non-success status.
    #[error("narrative service returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, truncated by the adapter.
        body: String,
    },

    /// The response envelope or the generated payload did not match the schema.
    #[error("malformed narrative response: {0}")]
    Malformed(String),

    /// No client is configured (missing API key).
    #[error("narrative service is not configured")]
    Unconfigured,
}

/// Port to the external text-generation service.
#[async_trait]
pub trait NarrativeClient: Send + Sync {
    /// Requests a narrative for `category`. A single attempt; no retries.
    async fn analyze(&self, category: Category) -> Result<Narrative, NarrativeError>;
}

/// A client that always reports [`NarrativeError::Unconfigured`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableNarrativeClient;

#[async_trait]
impl NarrativeClient for UnavailableNarrativeClient {
    async fn analyze(&self, _category: Category) -> Result<Narrative, NarrativeError> {
        Err(NarrativeError::Unconfigured)
    }
}

/// Calls `client` once and degrades to [`Narrative::fallback`] on any error.
pub async fn fetch_narrative(client: &dyn NarrativeClient, category: Category) -> Narrative {
    match client.analyze(category).await {
        Ok(narrative) => narrative,
        Err(err) => {
            tracing::error!(%category, error = %err, "narrative enrichment failed; using fallback");
            Narrative::fallback()
        }
    }
}
