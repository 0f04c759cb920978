//! Routes driving an assessment session through Landing, Quiz, Results
//! and Coach.
//!
//! Every transition answers with the full session snapshot so the host UI
//! can re-render from a single response.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use gifts_assessment::application::command_handlers;
use gifts_assessment::application::query_handlers::{
    AssessmentView, assessment_view, get_assessment_by_id,
};
use gifts_assessment::domain::aggregates::{Assessment, NarrativeTicket};
use gifts_assessment::domain::commands;
use gifts_core::category::Category;
use gifts_core::narrative::fetch_narrative;
use serde::{Deserialize, Serialize};
use tracing::{Instrument, error, info, instrument};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for PUT /{id}/answers/{question_id}.
#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    /// Likert rating, 1 through 5. Any integer is accepted here so that
    /// out-of-range values surface as validation errors.
    pub rating: i64,
}

/// Request body for POST /{id}/coach.
#[derive(Debug, Deserialize)]
pub struct SelectCategoryRequest {
    /// Category identifier, e.g. `teaching`.
    pub category: String,
}

/// Session snapshot returned by every route in this module.
#[derive(Debug, Serialize)]
pub struct AssessmentResponse {
    /// The snapshot.
    #[serde(flatten)]
    pub view: AssessmentView,
    /// Set on page turns; the host should reset its scroll position.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub scroll_to_top: bool,
}

impl AssessmentResponse {
    fn render(state: &AppState, assessment: &Assessment) -> Json<Self> {
        Json(Self {
            view: assessment_view(assessment, &state.catalog),
            scroll_to_top: false,
        })
    }

    fn page_turn(state: &AppState, assessment: &Assessment) -> Json<Self> {
        Json(Self {
            view: assessment_view(assessment, &state.catalog),
            scroll_to_top: true,
        })
    }
}

/// POST /
#[instrument(skip(state))]
async fn create_assessment(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<AssessmentResponse>), ApiError> {
    let command = commands::CreateAssessment {
        correlation_id: Uuid::new_v4(),
    };

    info!(correlation_id = %command.correlation_id, "handling create_assessment command");

    let assessment = command_handlers::handle_create_assessment(
        &command,
        state.page_size,
        &state.catalog,
        state.clock.as_ref(),
        &*state.repository,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        AssessmentResponse::render(&state, &assessment),
    ))
}

/// GET /{id}
#[instrument(skip(state))]
async fn get_assessment(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<AssessmentResponse>, ApiError> {
    let view = get_assessment_by_id(session_id, &state.catalog, &*state.repository).await?;
    Ok(Json(AssessmentResponse {
        view,
        scroll_to_top: false,
    }))
}

/// POST /{id}/start
#[instrument(skip(state))]
async fn start_quiz(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<AssessmentResponse>, ApiError> {
    let command = commands::StartQuiz {
        correlation_id: Uuid::new_v4(),
        session_id,
    };

    info!(correlation_id = %command.correlation_id, "handling start_quiz command");

    let assessment =
        command_handlers::handle_start_quiz(&command, state.clock.as_ref(), &*state.repository)
            .await?;

    Ok(AssessmentResponse::page_turn(&state, &assessment))
}

/// PUT /{id}/answers/{question_id}
#[instrument(skip(state, request), fields(rating = request.rating))]
async fn answer_question(
    State(state): State<AppState>,
    Path((session_id, question_id)): Path<(Uuid, u32)>,
    Json(request): Json<AnswerRequest>,
) -> Result<Json<AssessmentResponse>, ApiError> {
    let command = commands::AnswerQuestion {
        correlation_id: Uuid::new_v4(),
        session_id,
        question_id,
        rating: request.rating,
    };

    info!(correlation_id = %command.correlation_id, "handling answer_question command");

    let assessment = command_handlers::handle_answer_question(
        &command,
        &state.catalog,
        state.clock.as_ref(),
        &*state.repository,
    )
    .await?;

    Ok(AssessmentResponse::render(&state, &assessment))
}

/// POST /{id}/next
#[instrument(skip(state))]
async fn next_page(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<AssessmentResponse>, ApiError> {
    let command = commands::NextPage {
        correlation_id: Uuid::new_v4(),
        session_id,
    };

    info!(correlation_id = %command.correlation_id, "handling next_page command");

    let (assessment, _) = command_handlers::handle_next_page(
        &command,
        &state.catalog,
        state.clock.as_ref(),
        &*state.repository,
    )
    .await?;

    Ok(AssessmentResponse::page_turn(&state, &assessment))
}

/// POST /{id}/previous
#[instrument(skip(state))]
async fn previous_page(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<AssessmentResponse>, ApiError> {
    let command = commands::PreviousPage {
        correlation_id: Uuid::new_v4(),
        session_id,
    };

    info!(correlation_id = %command.correlation_id, "handling previous_page command");

    let (assessment, _) =
        command_handlers::handle_previous_page(&command, state.clock.as_ref(), &*state.repository)
            .await?;

    Ok(AssessmentResponse::page_turn(&state, &assessment))
}

/// POST /{id}/coach
#[instrument(skip(state, request), fields(category = %request.category))]
async fn select_category(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<SelectCategoryRequest>,
) -> Result<Json<AssessmentResponse>, ApiError> {
    let category: Category = request.category.parse()?;
    let command = commands::SelectCategory {
        correlation_id: Uuid::new_v4(),
        session_id,
        category,
    };

    info!(correlation_id = %command.correlation_id, "handling select_category command");

    let (assessment, ticket) = command_handlers::handle_select_category(
        &command,
        state.clock.as_ref(),
        &*state.repository,
    )
    .await?;

    spawn_narrative_fetch(&state, command.correlation_id, ticket);

    Ok(AssessmentResponse::render(&state, &assessment))
}

/// Fetches the narrative for `ticket` in the background and submits it.
///
/// The request outlives the HTTP call; whatever the session shows when it
/// finishes decides whether the result is kept.
fn spawn_narrative_fetch(state: &AppState, correlation_id: Uuid, ticket: NarrativeTicket) {
    let client = Arc::clone(&state.narrative_client);
    let clock = Arc::clone(&state.clock);
    let repository = Arc::clone(&state.repository);

    tokio::spawn(
        async move {
            let narrative = fetch_narrative(client.as_ref(), ticket.category).await;
            let command = commands::ResolveNarrative {
                correlation_id,
                ticket,
                narrative,
            };
            if let Err(err) =
                command_handlers::handle_resolve_narrative(&command, clock.as_ref(), &*repository)
                    .await
            {
                error!(error = %err, "failed to resolve narrative");
            }
        }
        .instrument(tracing::info_span!(
            "narrative_fetch",
            session_id = %ticket.session_id,
            category = %ticket.category,
            generation = ticket.generation
        )),
    );
}

/// POST /{id}/coach/back
#[instrument(skip(state))]
async fn back_to_results(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<AssessmentResponse>, ApiError> {
    let command = commands::BackToResults {
        correlation_id: Uuid::new_v4(),
        session_id,
    };

    info!(correlation_id = %command.correlation_id, "handling back_to_results command");

    let assessment = command_handlers::handle_back_to_results(
        &command,
        state.clock.as_ref(),
        &*state.repository,
    )
    .await?;

    Ok(AssessmentResponse::render(&state, &assessment))
}

/// POST /{id}/retake
#[instrument(skip(state))]
async fn retake(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<AssessmentResponse>, ApiError> {
    let command = commands::Retake {
        correlation_id: Uuid::new_v4(),
        session_id,
    };

    info!(correlation_id = %command.correlation_id, "handling retake command");

    let assessment =
        command_handlers::handle_retake(&command, state.clock.as_ref(), &*state.repository)
            .await?;

    Ok(AssessmentResponse::render(&state, &assessment))
}

/// Returns the router for assessment sessions.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_assessment))
        .route("/{id}", get(get_assessment))
        .route("/{id}/start", post(start_quiz))
        .route("/{id}/answers/{question_id}", put(answer_question))
        .route("/{id}/next", post(next_page))
        .route("/{id}/previous", post(previous_page))
        .route("/{id}/coach", post(select_category))
        .route("/{id}/coach/back", post(back_to_results))
        .route("/{id}/retake", post(retake))
}
