//! Query handlers for the assessment flow.
//!
//! Builds the read-only snapshot the host UI renders: the active view name,
//! the answer snapshot, and whichever of the quiz page, results, and Coach
//! detail the view needs.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use gifts_catalog::{Catalog, CategoryDefinition};
use gifts_core::category::Category;
use gifts_core::error::DomainError;
use gifts_core::narrative::Narrative;
use serde::Serialize;
use uuid::Uuid;

use crate::application::command_handlers;
use crate::domain::aggregates::{Assessment, CoachPanel, NarrativeState, Phase};
use crate::domain::scoring::CategoryResult;
use crate::repository::AssessmentRepository;

/// Number of result cards highlighted above the chart.
pub const TOP_CATEGORY_COUNT: usize = 3;

/// One question on the current quiz page.
#[derive(Debug, Serialize)]
pub struct QuizQuestionView {
    /// Question id.
    pub id: u32,
    /// Statement text.
    pub text: String,
    /// Category measured.
    pub category: Category,
    /// Rating given so far, if any.
    pub rating: Option<u8>,
}

/// The current quiz page.
#[derive(Debug, Serialize)]
pub struct QuizPageView {
    /// Zero-based page index.
    pub page: usize,
    /// Total number of pages.
    pub total_pages: usize,
    /// `Page N of M`.
    pub page_label: String,
    /// Questions on this page.
    pub questions: Vec<QuizQuestionView>,
    /// Whether the forward action is enabled.
    pub can_advance: bool,
    /// Answered questions across the whole quiz.
    pub answered: usize,
    /// Questions in the whole quiz.
    pub question_count: usize,
    /// Overall completion, rounded.
    pub progress_percent: usize,
    /// Label for the forward action.
    pub next_label: &'static str,
    /// Label for the backward action.
    pub back_label: &'static str,
}

/// A highlighted result card.
#[derive(Debug, Serialize)]
pub struct TopCategoryView {
    /// 1-based rank.
    pub rank: usize,
    /// The scored result.
    #[serde(flatten)]
    pub result: CategoryResult,
    /// Descriptive metadata for the card.
    pub definition: Option<CategoryDefinition>,
}

/// One chart bar.
#[derive(Debug, Serialize)]
pub struct ChartBar {
    /// Three-letter axis label.
    pub label: String,
    /// Full category label for the tooltip.
    pub name: String,
    /// Percentage.
    pub score: u32,
}

/// The Results view.
#[derive(Debug, Serialize)]
pub struct ResultsView {
    /// Every category, ranked.
    pub results: Vec<CategoryResult>,
    /// The first few ranked categories with their definitions.
    pub top: Vec<TopCategoryView>,
    /// Chart series in ranked order.
    pub chart: Vec<ChartBar>,
}

/// The Coach detail.
#[derive(Debug, Serialize)]
pub struct CoachView {
    /// Category coached.
    pub category: Category,
    /// Category metadata for the header.
    pub definition: Option<CategoryDefinition>,
    /// `loading` or `ready`.
    pub status: &'static str,
    /// Present once `status` is `ready`.
    pub narrative: Option<Narrative>,
}

/// Snapshot of a session for the host UI.
#[derive(Debug, Serialize)]
pub struct AssessmentView {
    /// The session identifier.
    pub session_id: Uuid,
    /// Current version.
    pub version: i64,
    /// `landing`, `quiz`, `results` or `coach`.
    pub view: &'static str,
    /// Question id → rating.
    pub answers: BTreeMap<u32, u8>,
    /// Present in the quiz.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quiz: Option<QuizPageView>,
    /// Present on Results and underneath Coach.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<ResultsView>,
    /// Present while Coach is open.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coach: Option<CoachView>,
    /// Session creation time.
    pub started_at: DateTime<Utc>,
    /// Last accepted transition.
    pub updated_at: DateTime<Utc>,
}

fn quiz_page(assessment: &Assessment, catalog: &Catalog) -> QuizPageView {
    let paginator = assessment.paginator();
    let answers = assessment.answers();
    let questions = paginator
        .current_slice(catalog.questions())
        .iter()
        .map(|q| QuizQuestionView {
            id: q.id,
            text: q.text.clone(),
            category: q.category,
            rating: answers.rating(q.id).map(|r| r.value()),
        })
        .collect();
    let question_count = catalog.question_count();
    let answered = answers.len();
    let progress_percent = if question_count == 0 {
        0
    } else {
        (answered * 200 + question_count) / (2 * question_count)
    };

    QuizPageView {
        page: paginator.current_page(),
        total_pages: paginator.total_pages(),
        page_label: format!(
            "Page {} of {}",
            paginator.current_page() + 1,
            paginator.total_pages()
        ),
        questions,
        can_advance: paginator.can_advance(catalog.questions(), answers),
        answered,
        question_count,
        progress_percent,
        next_label: if paginator.is_last_page() {
            "Finish Assessment"
        } else {
            "Next Page"
        },
        back_label: if paginator.current_page() == 0 {
            "Cancel"
        } else {
            "Back"
        },
    }
}

fn results_view(results: &[CategoryResult], catalog: &Catalog) -> ResultsView {
    let top = results
        .iter()
        .take(TOP_CATEGORY_COUNT)
        .enumerate()
        .map(|(i, result)| TopCategoryView {
            rank: i + 1,
            result: result.clone(),
            definition: catalog.definition(result.category).cloned(),
        })
        .collect();
    let chart = results
        .iter()
        .map(|result| ChartBar {
            label: result.category.label().chars().take(3).collect(),
            name: result.category.label().to_owned(),
            score: result.percentage,
        })
        .collect();

    ResultsView {
        results: results.to_vec(),
        top,
        chart,
    }
}

fn coach_view(panel: &CoachPanel, catalog: &Catalog) -> CoachView {
    let (status, narrative) = match &panel.narrative {
        NarrativeState::Loading => ("loading", None),
        NarrativeState::Ready(narrative) => ("ready", Some(narrative.clone())),
    };
    CoachView {
        category: panel.category,
        definition: catalog.definition(panel.category).cloned(),
        status,
        narrative,
    }
}

/// Renders `assessment` for the host UI.
#[must_use]
pub fn assessment_view(assessment: &Assessment, catalog: &Catalog) -> AssessmentView {
    let (quiz, results, coach) = match assessment.phase() {
        Phase::Landing => (None, None, None),
        Phase::Quiz => (Some(quiz_page(assessment, catalog)), None, None),
        Phase::Results { results, coach } => (
            None,
            Some(results_view(results, catalog)),
            coach.as_ref().map(|panel| coach_view(panel, catalog)),
        ),
    };

    AssessmentView {
        session_id: assessment.id,
        version: assessment.version(),
        view: assessment.phase().name(),
        answers: assessment.answers().snapshot(),
        quiz,
        results,
        coach,
        started_at: assessment.started_at(),
        updated_at: assessment.updated_at(),
    }
}

/// Retrieves a session snapshot by id.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if no session exists for the id.
pub async fn get_assessment_by_id(
    session_id: Uuid,
    catalog: &Catalog,
    repo: &dyn AssessmentRepository,
) -> Result<AssessmentView, DomainError> {
    let assessment = command_handlers::load(session_id, repo).await?;
    Ok(assessment_view(&assessment, catalog))
}
