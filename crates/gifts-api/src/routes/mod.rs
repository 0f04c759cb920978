//! Route modules.

use axum::Router;

use crate::state::AppState;

pub mod assessment;
pub mod catalog;
pub mod health;

/// Returns the full application router, unlayered and without state.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest("/api/v1/catalog", catalog::router())
        .nest("/api/v1/assessments", assessment::router())
}
