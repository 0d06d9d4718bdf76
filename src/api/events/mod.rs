//! Events API endpoints
//!
//! POST   /api/v1/events - Create an event (arms its reminder)
//! GET    /api/v1/events - List the caller's events
//! GET    /api/v1/events/categories - List category labels
//! GET    /api/v1/events/:id - Get event details
//! PUT    /api/v1/events/:id - Update an event (re-arms or disarms)
//! DELETE /api/v1/events/:id - Delete an event (disarms)

pub mod handlers;
pub mod types;

#[cfg(test)]
mod tests;

pub use handlers::{
    create_event, delete_event, get_event, list_categories, list_events, update_event,
};
pub use types::{CreateEventRequest, EventView, ListQuery, UpdateEventRequest};

use axum::{routing::get, Router};

/// Create events routes
pub fn events_routes() -> Router {
    Router::new()
        .route("/api/v1/events", get(list_events).post(create_event))
        .route("/api/v1/events/categories", get(list_categories))
        .route(
            "/api/v1/events/:id",
            get(get_event).put(update_event).delete(delete_event),
        )
}
