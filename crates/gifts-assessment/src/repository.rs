//! Session storage.
//!
//! Sessions live only as long as the server process. Saves are guarded by
//! an expected version so that a late narrative resolution cannot clobber
//! a transition the user made in the meantime.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use gifts_core::error::DomainError;
use uuid::Uuid;

use crate::domain::aggregates::Assessment;

/// Repository trait for loading and saving assessment sessions.
#[async_trait]
pub trait AssessmentRepository: Send + Sync {
    /// Load a session by id. `Ok(None)` if it does not exist.
    async fn load(&self, session_id: Uuid) -> Result<Option<Assessment>, DomainError>;

    /// Store `assessment`, which was loaded at `expected_version` (0 for a
    /// session that has never been stored).
    async fn save(&self, assessment: &Assessment, expected_version: i64)
    -> Result<(), DomainError>;
}

/// Process-local session map.
#[derive(Debug, Default)]
pub struct InMemoryAssessmentRepository {
    sessions: Mutex<HashMap<Uuid, Assessment>>,
}

impl InMemoryAssessmentRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the lock is poisoned.
    pub fn len(&self) -> Result<usize, DomainError> {
        Ok(self.lock()?.len())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<Uuid, Assessment>>, DomainError> {
        self.sessions
            .lock()
            .map_err(|_| DomainError::Infrastructure("session store lock poisoned".into()))
    }
}

#[async_trait]
impl AssessmentRepository for InMemoryAssessmentRepository {
    async fn load(&self, session_id: Uuid) -> Result<Option<Assessment>, DomainError> {
        Ok(self.lock()?.get(&session_id).cloned())
    }

    async fn save(
        &self,
        assessment: &Assessment,
        expected_version: i64,
    ) -> Result<(), DomainError> {
        let mut sessions = self.lock()?;
        let actual = sessions.get(&assessment.id).map_or(0, Assessment::version);
        if actual != expected_version {
            return Err(DomainError::ConcurrencyConflict {
                session_id: assessment.id,
                expected: expected_version,
                actual,
            });
        }
        sessions.insert(assessment.id, assessment.clone());
        Ok(())
    }
}
