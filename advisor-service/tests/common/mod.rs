//! Shared helpers for advisor-service integration tests.

#![allow(dead_code)]

use advisor_service::services::providers::mock::MockTextProvider;
use advisor_service::services::providers::CompletionParams;
use advisor_service::services::AdvisorService;
use advisor_service::{build_router, AppState};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

/// Router wired to `mock`, with keyword extraction enabled.
pub fn app_with(mock: Arc<MockTextProvider>) -> Router {
    app_with_options(mock, true)
}

pub fn app_with_options(mock: Arc<MockTextProvider>, extract_keywords: bool) -> Router {
    let advisor = AdvisorService::new(mock, CompletionParams::default(), extract_keywords);
    build_router(AppState { advisor })
}

/// POST a raw body as JSON and return status plus decoded JSON response.
pub async fn post_json(app: Router, uri: &str, body: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}
