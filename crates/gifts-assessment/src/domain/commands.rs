//! Commands for the assessment flow.

use gifts_core::category::Category;
use gifts_core::narrative::Narrative;
use uuid::Uuid;

use super::aggregates::NarrativeTicket;

/// Command to open a new session on the Landing view.
#[derive(Debug, Clone)]
pub struct CreateAssessment {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

/// Command to leave Landing and begin the quiz.
#[derive(Debug, Clone)]
pub struct StartQuiz {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session to start.
    pub session_id: Uuid,
}

/// Command to rate a single question.
#[derive(Debug, Clone)]
pub struct AnswerQuestion {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session being answered.
    pub session_id: Uuid,
    /// Question bank id.
    pub question_id: u32,
    /// Raw rating as submitted, validated into `Rating` by the aggregate.
    pub rating: i64,
}

/// Command to move to the next quiz page (or finish on the last page).
#[derive(Debug, Clone)]
pub struct NextPage {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session to advance.
    pub session_id: Uuid,
}

/// Command to move to the previous quiz page (or cancel on the first page).
#[derive(Debug, Clone)]
pub struct PreviousPage {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session to move back.
    pub session_id: Uuid,
}

/// Command to open the Coach detail for a category.
#[derive(Debug, Clone)]
pub struct SelectCategory {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session showing results.
    pub session_id: Uuid,
    /// The category to coach on.
    pub category: Category,
}

/// Command to close the Coach detail.
#[derive(Debug, Clone)]
pub struct BackToResults {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session showing the Coach detail.
    pub session_id: Uuid,
}

/// Command to discard the answers and return to Landing.
#[derive(Debug, Clone)]
pub struct Retake {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session to reset.
    pub session_id: Uuid,
}

/// Command delivering a narrative for a previously issued ticket.
#[derive(Debug, Clone)]
pub struct ResolveNarrative {
    /// The correlation ID of the `SelectCategory` that issued the ticket.
    pub correlation_id: Uuid,
    /// The ticket returned when the Coach view was entered.
    pub ticket: NarrativeTicket,
    /// The narrative (or fallback) to show.
    pub narrative: Narrative,
}
