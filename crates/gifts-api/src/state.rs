//! Shared application state.

use std::num::NonZeroUsize;
use std::sync::Arc;

use gifts_assessment::repository::AssessmentRepository;
use gifts_catalog::Catalog;
use gifts_core::clock::Clock;
use gifts_core::narrative::NarrativeClient;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Validated category catalog and question bank.
    pub catalog: Arc<Catalog>,
    /// Clock for session timestamps.
    pub clock: Arc<dyn Clock>,
    /// Session storage.
    pub repository: Arc<dyn AssessmentRepository>,
    /// Narrative service used by the Coach view.
    pub narrative_client: Arc<dyn NarrativeClient>,
    /// Questions per quiz page.
    pub page_size: NonZeroUsize,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        catalog: Arc<Catalog>,
        clock: Arc<dyn Clock>,
        repository: Arc<dyn AssessmentRepository>,
        narrative_client: Arc<dyn NarrativeClient>,
        page_size: NonZeroUsize,
    ) -> Self {
        Self {
            catalog,
            clock,
            repository,
            narrative_client,
            page_size,
        }
    }
}
