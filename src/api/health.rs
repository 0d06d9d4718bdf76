//! Health check endpoint

use axum::response::Json;
use axum::routing::get;
use axum::{Extension, Router};
use eventide_core::ReminderScheduler;
use serde::Serialize;
use std::sync::Arc;

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// Currently armed reminder timers
    pub armed_reminders: usize,
}

/// `GET /health`: liveness plus a scheduler gauge
pub async fn health(
    Extension(scheduler): Extension<Arc<ReminderScheduler>>,
) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        armed_reminders: scheduler.armed_count().await,
    })
}

/// Create health routes
pub fn health_routes() -> Router {
    Router::new().route("/health", get(health))
}
