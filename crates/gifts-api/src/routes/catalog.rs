//! Read-only access to the category catalog and question bank.

use axum::extract::State;
use axum::{Json, Router, routing::get};
use gifts_catalog::Catalog;

use crate::state::AppState;

/// GET /
///
/// Categories with their definitions, in ranking tie-break order, and the
/// questions in quiz order.
async fn get_catalog(State(state): State<AppState>) -> Json<Catalog> {
    Json(state.catalog.as_ref().clone())
}

/// Returns the router for the catalog.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_catalog))
}
