use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use eventide_core::{Error as CoreError, Event, EventStore, ReminderScheduler};

use super::super::ApiResponse;
use super::types::{
    event_to_view, parse_filter, parse_new_event, parse_update, CreateEventRequest, EventView,
    ListQuery, UpdateEventRequest,
};
use crate::middleware::auth::RequireAuth;

/// Arm or disarm the reminder for an event after a CRUD mutation. A failure
/// here never rolls back the mutation that triggered it.
async fn sync_reminder(scheduler: &ReminderScheduler, event: &Event) {
    let result = if event.reminder.is_some() {
        scheduler.schedule(event).await
    } else {
        scheduler.cancel(event.id).await;
        Ok(())
    };

    if let Err(e) = result {
        warn!(event_id = %event.id, error = %e, "failed to arm reminder");
    }
}

/// Create a new event (requires authentication)
#[utoipa::path(
    post,
    path = "/api/v1/events",
    tag = "events",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Created event", body = EventView),
        (status = 400, description = "Invalid date, time, or reminder"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer" = []))
)]
pub async fn create_event(
    RequireAuth(user): RequireAuth,
    Extension(events): Extension<Arc<EventStore>>,
    Extension(scheduler): Extension<Arc<ReminderScheduler>>,
    Json(request): Json<CreateEventRequest>,
) -> (StatusCode, Json<ApiResponse<EventView>>) {
    let new = match parse_new_event(request) {
        Ok(new) => new,
        Err(e) => return (StatusCode::BAD_REQUEST, Json(ApiResponse::error(e))),
    };

    let event = Event::new(user.user_id, new);
    if let Err(e) = events.create(&event).await {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("failed to create event: {}", e))),
        );
    }

    sync_reminder(&scheduler, &event).await;

    info!(event_id = %event.id, name = %event.name, "created event");
    (
        StatusCode::CREATED,
        Json(ApiResponse::success(event_to_view(&event))),
    )
}

/// List the caller's events (requires authentication)
#[utoipa::path(
    get,
    path = "/api/v1/events",
    tag = "events",
    params(
        ("category" = Option<String>, Query, description = "Filter by category"),
        ("has_reminder" = Option<bool>, Query, description = "Filter by reminder presence"),
        ("sort" = Option<String>, Query, description = "Sort order: date or category")
    ),
    responses(
        (status = 200, description = "List of events", body = Vec<EventView>),
        (status = 400, description = "Invalid query parameters"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer" = []))
)]
pub async fn list_events(
    RequireAuth(user): RequireAuth,
    Extension(events): Extension<Arc<EventStore>>,
    Query(query): Query<ListQuery>,
) -> (StatusCode, Json<ApiResponse<Vec<EventView>>>) {
    let filter = match parse_filter(query) {
        Ok(filter) => filter,
        Err(e) => return (StatusCode::BAD_REQUEST, Json(ApiResponse::error(e))),
    };

    match events.list(user.user_id, &filter).await {
        Ok(list) => {
            let views = list.iter().map(event_to_view).collect();
            (StatusCode::OK, Json(ApiResponse::success(views)))
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("failed to list events: {}", e))),
        ),
    }
}

/// Get event details (requires authentication)
#[utoipa::path(
    get,
    path = "/api/v1/events/{id}",
    tag = "events",
    params(("id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event details", body = EventView),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Event not found")
    ),
    security(("bearer" = []))
)]
pub async fn get_event(
    RequireAuth(user): RequireAuth,
    Extension(events): Extension<Arc<EventStore>>,
    Path(id): Path<Uuid>,
) -> (StatusCode, Json<ApiResponse<EventView>>) {
    match events.get(user.user_id, id).await {
        Ok(event) => (
            StatusCode::OK,
            Json(ApiResponse::success(event_to_view(&event))),
        ),
        Err(CoreError::EventNotFound(_)) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Event not found")),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("failed to fetch event: {}", e))),
        ),
    }
}

/// Update an event (requires authentication)
#[utoipa::path(
    put,
    path = "/api/v1/events/{id}",
    tag = "events",
    params(("id" = Uuid, Path, description = "Event ID")),
    request_body = UpdateEventRequest,
    responses(
        (status = 200, description = "Updated event", body = EventView),
        (status = 400, description = "Invalid date, time, or reminder"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Event not found")
    ),
    security(("bearer" = []))
)]
pub async fn update_event(
    RequireAuth(user): RequireAuth,
    Extension(events): Extension<Arc<EventStore>>,
    Extension(scheduler): Extension<Arc<ReminderScheduler>>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateEventRequest>,
) -> (StatusCode, Json<ApiResponse<EventView>>) {
    let update = match parse_update(request) {
        Ok(update) => update,
        Err(e) => return (StatusCode::BAD_REQUEST, Json(ApiResponse::error(e))),
    };

    let mut event = match events.get(user.user_id, id).await {
        Ok(event) => event,
        Err(CoreError::EventNotFound(_)) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error("Event not found")),
            )
        }
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(format!("failed to fetch event: {}", e))),
            )
        }
    };

    event.apply(update);
    if let Err(e) = events.update(&event).await {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("failed to update event: {}", e))),
        );
    }

    sync_reminder(&scheduler, &event).await;

    info!(event_id = %event.id, "updated event");
    (
        StatusCode::OK,
        Json(ApiResponse::success(event_to_view(&event))),
    )
}

/// Delete an event (requires authentication)
#[utoipa::path(
    delete,
    path = "/api/v1/events/{id}",
    tag = "events",
    params(("id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 204, description = "Event deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Event not found")
    ),
    security(("bearer" = []))
)]
pub async fn delete_event(
    RequireAuth(user): RequireAuth,
    Extension(events): Extension<Arc<EventStore>>,
    Extension(scheduler): Extension<Arc<ReminderScheduler>>,
    Path(id): Path<Uuid>,
) -> Response {
    match events.delete(user.user_id, id).await {
        Ok(()) => {
            // Disarm regardless of whether the offset had already elapsed
            scheduler.cancel(id).await;
            info!(event_id = %id, "deleted event");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(CoreError::EventNotFound(_)) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<()>::error("Event not found")),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<()>::error(format!(
                "failed to delete event: {}",
                e
            ))),
        )
            .into_response(),
    }
}

/// List category labels (requires authentication)
#[utoipa::path(
    get,
    path = "/api/v1/events/categories",
    tag = "events",
    responses(
        (status = 200, description = "Category labels", body = Vec<String>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer" = []))
)]
pub async fn list_categories(RequireAuth(_user): RequireAuth) -> Json<ApiResponse<Vec<String>>> {
    let categories = eventide_core::events::CATEGORIES
        .iter()
        .map(|c| c.to_string())
        .collect();
    Json(ApiResponse::success(categories))
}
