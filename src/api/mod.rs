//! Web API module for Eventide
//!
//! Provides REST API endpoints for:
//! - Identity (register/login)
//! - Event CRUD with reminder scheduling side effects
//! - Health checks

pub mod auth;
pub mod events;
pub mod health;

use axum::Router;
use serde::Serialize;

pub use auth::auth_routes;
pub use events::events_routes;
pub use health::health_routes;

/// Standard response envelope
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> ApiResponse<T> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Create the API router with all endpoints
pub fn api_router() -> Router {
    Router::new()
        .merge(auth_routes())
        .merge(events_routes())
        .merge(health_routes())
}
