pub mod config;
pub mod dtos;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod startup;

use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::middleware::{request_id_middleware, security_headers_middleware};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::metrics_middleware;
use crate::services::AdvisorService;

/// Shared application state. Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub advisor: AdvisorService,
}

pub fn build_router(state: AppState) -> Router {
    services::metrics::init_metrics();

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics::metrics))
        .route(
            "/extract_action_items",
            post(handlers::extract_action_items),
        )
        .route("/investment_advice", post(handlers::investment_advice))
        .route_layer(from_fn(metrics_middleware))
        .fallback(handlers::not_found)
        .with_state(state)
        .layer(from_fn(security_headers_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(from_fn(request_id_middleware))
}
