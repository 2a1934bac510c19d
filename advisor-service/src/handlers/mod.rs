//! HTTP handlers for the advisor service.

pub mod advice;
pub mod health;
pub mod metrics;

pub use advice::{extract_action_items, investment_advice};
pub use health::health_check;

use axum::http::Uri;
use service_core::error::AppError;

/// Fallback for unknown routes.
pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(anyhow::anyhow!("No route for {}", uri.path()))
}
