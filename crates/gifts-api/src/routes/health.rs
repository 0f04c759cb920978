//! Liveness endpoint for the assessment service.

use axum::extract::State;
use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::state::AppState;

/// Liveness report, including the size of the loaded catalog.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `ok` while the server is answering.
    pub status: &'static str,
    /// Crate version of the running binary.
    pub version: &'static str,
    /// Categories in the loaded catalog.
    pub categories: usize,
    /// Questions in the loaded catalog.
    pub questions: usize,
    /// Questions per quiz page.
    pub page_size: usize,
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        categories: state.catalog.categories().len(),
        questions: state.catalog.question_count(),
        page_size: state.page_size.get(),
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
