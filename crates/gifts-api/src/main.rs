//! Spiritual gifts assessment API server entry point.

use std::sync::Arc;

use gifts_api::config::AppConfig;
use gifts_api::error::AppError;
use gifts_api::routes;
use gifts_api::state::AppState;
use gifts_assessment::repository::InMemoryAssessmentRepository;
use gifts_catalog::Catalog;
use gifts_core::clock::SystemClock;
use gifts_core::narrative::{NarrativeClient, UnavailableNarrativeClient};
use gifts_gemini::GeminiNarrativeClient;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting spiritual gifts assessment API server");

    let config = AppConfig::from_env()?;

    let catalog = match &config.catalog_path {
        Some(path) => Catalog::from_path(path)?,
        None => Catalog::shipped()?,
    };
    tracing::info!(
        categories = catalog.categories().len(),
        questions = catalog.question_count(),
        "catalog loaded"
    );

    let narrative_client: Arc<dyn NarrativeClient> = match config.gemini.clone() {
        Some(gemini) => {
            tracing::info!(model = %gemini.model, "narrative enrichment enabled");
            Arc::new(
                GeminiNarrativeClient::new(gemini)
                    .map_err(|e| AppError::Config(format!("narrative client: {e}")))?,
            )
        }
        None => {
            tracing::warn!("GEMINI_API_KEY not set; coach will show the fallback narrative");
            Arc::new(UnavailableNarrativeClient)
        }
    };

    let app_state = AppState::new(
        Arc::new(catalog),
        Arc::new(SystemClock),
        Arc::new(InMemoryAssessmentRepository::new()),
        narrative_client,
        config.page_size,
    );

    // TODO: Replace CorsLayer::permissive() with the front-end origin once it is deployed.
    let app = routes::router()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    let addr = config.socket_addr()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
