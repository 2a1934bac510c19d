use crate::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let provider = state.advisor.provider();
    Json(json!({
        "status": "ok",
        "service": "advisor-service",
        "version": env!("CARGO_PKG_VERSION"),
        "provider": provider.name(),
        "model": provider.model(),
    }))
}
