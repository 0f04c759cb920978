//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use gifts_assessment::domain::pagination::DEFAULT_PAGE_SIZE;
use gifts_assessment::repository::InMemoryAssessmentRepository;
use gifts_catalog::Catalog;
use gifts_core::clock::Clock;
use gifts_core::narrative::NarrativeClient;
use gifts_test_support::{FixedClock, ScriptedNarrativeClient};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use gifts_api::routes;
use gifts_api::state::AppState;

/// Fixed timestamp used across all integration tests.
fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(
        chrono::TimeZone::with_ymd_and_hms(&chrono::Utc, 2026, 1, 15, 10, 0, 0).unwrap(),
    ))
}

/// Build the full app router with the shipped catalog, an in-memory session
/// store, a fixed clock and a scripted narrative client. Uses the same route
/// structure as `main.rs`.
pub fn build_test_app() -> Router {
    build_test_app_with(Arc::new(ScriptedNarrativeClient::new()))
}

/// Build the full app router with a custom narrative client.
pub fn build_test_app_with(narrative_client: Arc<dyn NarrativeClient>) -> Router {
    let app_state = AppState::new(
        Arc::new(Catalog::shipped().unwrap()),
        fixed_clock(),
        Arc::new(InMemoryAssessmentRepository::new()),
        narrative_client,
        DEFAULT_PAGE_SIZE,
    );

    routes::router().with_state(app_state)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(app: &Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    send(app, request).await
}

/// Send a POST request without a body and return the response.
pub async fn post_empty(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

/// Send a PUT request with a JSON body and return the response.
pub async fn put_json(app: &Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("PUT")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    send(app, request).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

/// Create a session and return its id.
pub async fn create_session(app: &Router) -> String {
    let (status, json) = post_empty(app, "/api/v1/assessments").await;
    assert_eq!(status, StatusCode::CREATED);
    json["session_id"].as_str().unwrap().to_string()
}

/// Answer every question on the current page with `rate(category)` and
/// return the last snapshot.
pub async fn answer_page(app: &Router, id: &str, page: &Value, rate: impl Fn(&str) -> u8) -> Value {
    let mut last = page.clone();
    for question in page["quiz"]["questions"].as_array().unwrap() {
        let qid = question["id"].as_u64().unwrap();
        let rating = rate(question["category"].as_str().unwrap());
        let (status, json) = put_json(
            app,
            &format!("/api/v1/assessments/{id}/answers/{qid}"),
            &serde_json::json!({ "rating": rating }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        last = json;
    }
    last
}

/// Start the quiz, answer every page with `rate(category)` and return the
/// Results snapshot.
pub async fn complete_quiz(app: &Router, id: &str, rate: impl Fn(&str) -> u8) -> Value {
    let (status, mut page) = post_empty(app, &format!("/api/v1/assessments/{id}/start")).await;
    assert_eq!(status, StatusCode::OK);

    while page["view"] == "quiz" {
        answer_page(app, id, &page, &rate).await;
        let (status, json) = post_empty(app, &format!("/api/v1/assessments/{id}/next")).await;
        assert_eq!(status, StatusCode::OK);
        page = json;
    }
    page
}

/// Poll the session until the Coach narrative is ready, or give up.
pub async fn wait_for_coach_ready(app: &Router, id: &str) -> Value {
    for _ in 0..200 {
        let (status, json) = get_json(app, &format!("/api/v1/assessments/{id}")).await;
        assert_eq!(status, StatusCode::OK);
        if json["coach"]["status"] == "ready" {
            return json;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("coach narrative never became ready");
}
