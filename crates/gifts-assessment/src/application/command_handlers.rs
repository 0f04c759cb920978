//! Command handlers for the assessment flow.
//!
//! Each handler loads the session, runs one transition on the aggregate,
//! and saves it back at the version it was loaded with. A save that loses
//! a version race is retried from a fresh load.

use std::num::NonZeroUsize;

use gifts_catalog::Catalog;
use gifts_core::clock::Clock;
use gifts_core::error::DomainError;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::aggregates::{Assessment, NarrativeTicket, QuizBackward, QuizForward};
use crate::domain::commands::{
    AnswerQuestion, BackToResults, CreateAssessment, NextPage, PreviousPage, ResolveNarrative,
    Retake, SelectCategory, StartQuiz,
};
use crate::repository::AssessmentRepository;

/// Load-transition-save attempts made before a version conflict is reported.
const SAVE_ATTEMPTS: usize = 3;

pub(crate) async fn load(
    session_id: Uuid,
    repo: &dyn AssessmentRepository,
) -> Result<Assessment, DomainError> {
    repo.load(session_id)
        .await?
        .ok_or(DomainError::NotFound(session_id))
}

/// Loads the session, applies `transition`, and saves on success.
///
/// A `ConcurrencyConflict` on save reloads the session and re-runs
/// `transition` against the newer state, up to `SAVE_ATTEMPTS` times.
async fn execute<T>(
    session_id: Uuid,
    repo: &dyn AssessmentRepository,
    mut transition: impl FnMut(&mut Assessment) -> Result<T, DomainError>,
) -> Result<(Assessment, T), DomainError> {
    let mut last_conflict = None;

    for _ in 0..SAVE_ATTEMPTS {
        let mut assessment = load(session_id, repo).await?;
        let expected_version = assessment.version();
        let outcome = transition(&mut assessment).inspect_err(|err| {
            warn!(%session_id, error = %err, "transition rejected");
        })?;
        match repo.save(&assessment, expected_version).await {
            Ok(()) => return Ok((assessment, outcome)),
            Err(conflict @ DomainError::ConcurrencyConflict { .. }) => {
                warn!(%session_id, "save conflicted; retrying");
                last_conflict = Some(conflict);
            }
            Err(err) => return Err(err),
        }
    }

    Err(last_conflict
        .unwrap_or_else(|| DomainError::Infrastructure("transition made no attempts".into())))
}

/// Handles `CreateAssessment`: opens a new session on Landing.
///
/// The handler generates the session id.
///
/// # Errors
///
/// Returns `DomainError` if saving fails.
pub async fn handle_create_assessment(
    command: &CreateAssessment,
    page_size: NonZeroUsize,
    catalog: &Catalog,
    clock: &dyn Clock,
    repo: &dyn AssessmentRepository,
) -> Result<Assessment, DomainError> {
    let assessment = Assessment::new(Uuid::new_v4(), page_size, catalog.question_count(), clock);
    repo.save(&assessment, 0).await?;
    info!(
        correlation_id = %command.correlation_id,
        session_id = %assessment.id,
        "assessment session created"
    );
    Ok(assessment)
}

/// Handles `StartQuiz`.
///
/// # Errors
///
/// Returns `DomainError::NotFound`, `InvalidTransition`, or a repository error.
pub async fn handle_start_quiz(
    command: &StartQuiz,
    clock: &dyn Clock,
    repo: &dyn AssessmentRepository,
) -> Result<Assessment, DomainError> {
    let (assessment, ()) = execute(command.session_id, repo, |a| a.start(clock)).await?;
    info!(correlation_id = %command.correlation_id, "quiz started");
    Ok(assessment)
}

/// Handles `AnswerQuestion`.
///
/// # Errors
///
/// Returns `DomainError::Validation` for a bad rating or question id,
/// `InvalidTransition` outside the quiz, or a repository error.
pub async fn handle_answer_question(
    command: &AnswerQuestion,
    catalog: &Catalog,
    clock: &dyn Clock,
    repo: &dyn AssessmentRepository,
) -> Result<Assessment, DomainError> {
    let (assessment, ()) = execute(command.session_id, repo, |a| {
        a.answer(command.question_id, command.rating, catalog, clock)
    })
    .await?;
    debug!(
        correlation_id = %command.correlation_id,
        question_id = command.question_id,
        rating = command.rating,
        "answer recorded"
    );
    Ok(assessment)
}

/// Handles `NextPage`. Finishing the last page enters Results.
///
/// # Errors
///
/// Returns `DomainError::PageIncomplete` if the page is not fully answered,
/// `InvalidTransition` outside the quiz, or a repository error.
pub async fn handle_next_page(
    command: &NextPage,
    catalog: &Catalog,
    clock: &dyn Clock,
    repo: &dyn AssessmentRepository,
) -> Result<(Assessment, QuizForward), DomainError> {
    let (assessment, step) =
        execute(command.session_id, repo, |a| a.next_page(catalog, clock)).await?;
    match step {
        QuizForward::Page(page) => {
            info!(correlation_id = %command.correlation_id, page, "advanced to next page");
        }
        QuizForward::Results => {
            info!(correlation_id = %command.correlation_id, "assessment complete");
        }
    }
    Ok((assessment, step))
}

/// Handles `PreviousPage`. Going back from the first page cancels the quiz.
///
/// # Errors
///
/// Returns `DomainError::InvalidTransition` outside the quiz, or a repository error.
pub async fn handle_previous_page(
    command: &PreviousPage,
    clock: &dyn Clock,
    repo: &dyn AssessmentRepository,
) -> Result<(Assessment, QuizBackward), DomainError> {
    let (assessment, step) = execute(command.session_id, repo, |a| a.previous_page(clock)).await?;
    match step {
        QuizBackward::Page(page) => {
            info!(correlation_id = %command.correlation_id, page, "returned to previous page");
        }
        QuizBackward::Landing => {
            info!(correlation_id = %command.correlation_id, "quiz cancelled; answers discarded");
        }
    }
    Ok((assessment, step))
}

/// Handles `SelectCategory`: opens the Coach detail and returns the ticket
/// the caller must resolve.
///
/// # Errors
///
/// Returns `DomainError::InvalidTransition` unless Results is showing
/// without a Coach detail, or a repository error.
pub async fn handle_select_category(
    command: &SelectCategory,
    clock: &dyn Clock,
    repo: &dyn AssessmentRepository,
) -> Result<(Assessment, NarrativeTicket), DomainError> {
    let (assessment, ticket) = execute(command.session_id, repo, |a| {
        a.select_category(command.category, clock)
    })
    .await?;
    info!(
        correlation_id = %command.correlation_id,
        category = %ticket.category,
        generation = ticket.generation,
        "coach opened"
    );
    Ok((assessment, ticket))
}

/// Handles `BackToResults`.
///
/// # Errors
///
/// Returns `DomainError::InvalidTransition` unless a Coach detail is open,
/// or a repository error.
pub async fn handle_back_to_results(
    command: &BackToResults,
    clock: &dyn Clock,
    repo: &dyn AssessmentRepository,
) -> Result<Assessment, DomainError> {
    let (assessment, ()) = execute(command.session_id, repo, |a| a.back_to_results(clock)).await?;
    info!(correlation_id = %command.correlation_id, "coach closed");
    Ok(assessment)
}

/// Handles `Retake`.
///
/// # Errors
///
/// Returns `DomainError::InvalidTransition` unless Results is showing
/// without a Coach detail, or a repository error.
pub async fn handle_retake(
    command: &Retake,
    clock: &dyn Clock,
    repo: &dyn AssessmentRepository,
) -> Result<Assessment, DomainError> {
    let (assessment, ()) = execute(command.session_id, repo, |a| a.retake(clock)).await?;
    info!(correlation_id = %command.correlation_id, "assessment reset for retake");
    Ok(assessment)
}

/// Handles `ResolveNarrative`: applies the narrative if the ticket is still
/// current. Returns whether it was applied.
///
/// A session that no longer exists, or that has moved on from the ticket's
/// Coach panel, discards the narrative. Version conflicts are retried by
/// reloading and re-checking the ticket.
///
/// # Errors
///
/// Returns a repository error, or `DomainError::ConcurrencyConflict` if every
/// attempt conflicted.
pub async fn handle_resolve_narrative(
    command: &ResolveNarrative,
    clock: &dyn Clock,
    repo: &dyn AssessmentRepository,
) -> Result<bool, DomainError> {
    let ticket = &command.ticket;
    let mut last_conflict = None;

    for _ in 0..SAVE_ATTEMPTS {
        let Some(mut assessment) = repo.load(ticket.session_id).await? else {
            debug!(session_id = %ticket.session_id, "session gone; narrative discarded");
            return Ok(false);
        };
        let expected_version = assessment.version();
        if !assessment.apply_narrative(ticket, command.narrative.clone(), clock) {
            debug!(
                correlation_id = %command.correlation_id,
                session_id = %ticket.session_id,
                generation = ticket.generation,
                "stale narrative discarded"
            );
            return Ok(false);
        }
        match repo.save(&assessment, expected_version).await {
            Ok(()) => {
                info!(
                    correlation_id = %command.correlation_id,
                    session_id = %ticket.session_id,
                    category = %ticket.category,
                    "narrative applied"
                );
                return Ok(true);
            }
            Err(conflict @ DomainError::ConcurrencyConflict { .. }) => {
                warn!(session_id = %ticket.session_id, "narrative save conflicted; retrying");
                last_conflict = Some(conflict);
            }
            Err(err) => return Err(err),
        }
    }

    Err(last_conflict.unwrap_or_else(|| {
        DomainError::Infrastructure("narrative resolution made no attempts".into())
    }))
}
