//! Test narrative clients: `NarrativeClient` doubles for tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use gifts_core::category::Category;
use gifts_core::narrative::{Narrative, NarrativeClient, NarrativeError};
use tokio::sync::{Notify, Semaphore};

/// A recognisable narrative for `category`.
#[must_use]
pub fn sample_narrative(category: Category) -> Narrative {
    Narrative {
        summary: format!("{category} in maturity."),
        biblical_role_models: vec!["Moses".to_owned(), "Deborah".to_owned(), "Paul".to_owned()],
        potential_pitfalls: vec![
            "Pride".to_owned(),
            "Impatience".to_owned(),
            "Isolation".to_owned(),
        ],
        growth_plan: format!("Practice {category} once a day this week."),
    }
}

/// A client that answers every request with [`sample_narrative`] and
/// records the categories it was asked about.
#[derive(Debug, Default)]
pub struct ScriptedNarrativeClient {
    requests: Mutex<Vec<Category>>,
}

impl ScriptedNarrativeClient {
    /// Creates a client with no recorded requests.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Categories requested so far, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn requests(&self) -> Vec<Category> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl NarrativeClient for ScriptedNarrativeClient {
    async fn analyze(&self, category: Category) -> Result<Narrative, NarrativeError> {
        self.requests.lock().unwrap().push(category);
        Ok(sample_narrative(category))
    }
}

/// A client whose every request fails with a transport error.
#[derive(Debug)]
pub struct FailingNarrativeClient;

#[async_trait]
impl NarrativeClient for FailingNarrativeClient {
    async fn analyze(&self, _category: Category) -> Result<Narrative, NarrativeError> {
        Err(NarrativeError::Transport("connection refused".into()))
    }
}

/// A client that holds every request until [`GatedNarrativeClient::release`]
/// is called, then answers with [`sample_narrative`]. Lets tests navigate
/// while a request is in flight.
#[derive(Debug)]
pub struct GatedNarrativeClient {
    gate: Semaphore,
    answered: AtomicUsize,
    answered_signal: Notify,
}

impl GatedNarrativeClient {
    /// Creates a client with the gate closed.
    #[must_use]
    pub fn new() -> Self {
        Self {
            gate: Semaphore::new(0),
            answered: AtomicUsize::new(0),
            answered_signal: Notify::new(),
        }
    }

    /// Lets one pending (or future) request complete.
    pub fn release(&self) {
        self.gate.add_permits(1);
    }

    /// Number of requests answered so far.
    #[must_use]
    pub fn answered(&self) -> usize {
        self.answered.load(Ordering::SeqCst)
    }

    /// Waits until at least `count` requests have been answered.
    pub async fn wait_answered(&self, count: usize) {
        loop {
            let signal = self.answered_signal.notified();
            if self.answered() >= count {
                return;
            }
            signal.await;
        }
    }
}

impl Default for GatedNarrativeClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NarrativeClient for GatedNarrativeClient {
    async fn analyze(&self, category: Category) -> Result<Narrative, NarrativeError> {
        let permit = self
            .gate
            .acquire()
            .await
            .map_err(|e| NarrativeError::Transport(e.to_string()))?;
        permit.forget();
        self.answered.fetch_add(1, Ordering::SeqCst);
        self.answered_signal.notify_waiters();
        Ok(sample_narrative(category))
    }
}
