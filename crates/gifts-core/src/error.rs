//! Domain error types.

use thiserror::Error;
use uuid::Uuid;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// No assessment session exists with the given id.
    #[error("assessment session not found: {0}")]
    NotFound(Uuid),

    /// Input rejected by domain rules (rating out of range, unknown question).
    #[error("validation error: {0}")]
    Validation(String),

    /// The requested transition is not legal from the current view.
    #[error("cannot {action} while in the {view} view")]
    InvalidTransition {
        /// The transition that was attempted.
        action: &'static str,
        /// The view the session was in.
        view: &'static str,
    },

    /// Forward navigation attempted before every question on the page was answered.
    #[error("page {page} has {unanswered} unanswered question(s)")]
    PageIncomplete {
        /// Zero-based page index.
        page: usize,
        /// Number of questions on the page still missing a rating.
        unanswered: usize,
    },

    /// Optimistic concurrency conflict.
    #[error(
        "concurrency conflict on session {session_id}: expected version {expected}, found {actual}"
    )]
    ConcurrencyConflict {
        /// The session that had the conflict.
        session_id: Uuid,
        /// The expected version.
        expected: i64,
        /// The actual version found.
        actual: i64,
    },

    /// An infrastructure error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
