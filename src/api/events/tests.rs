#![allow(clippy::unwrap_used)]

use super::types::{
    parse_filter, parse_new_event, parse_reminder, parse_update, CreateEventRequest, ListQuery,
    ReminderRequest, UpdateEventRequest,
};
use eventide_core::events::EventSort;
use eventide_core::{OffsetUnit, ReminderSpec};

fn create_request(date: &str, time: &str) -> CreateEventRequest {
    CreateEventRequest {
        name: "Test Event".to_string(),
        description: Some("Test Description".to_string()),
        category: Some("Meetings".to_string()),
        date: date.to_string(),
        time: time.to_string(),
        reminder: Some(ReminderRequest {
            offset_amount: 30,
            offset_unit: "minutes".to_string(),
        }),
    }
}

#[test]
fn test_parse_reminder_units() {
    for (unit, expected) in [
        ("minutes", OffsetUnit::Minutes),
        ("hours", OffsetUnit::Hours),
        ("days", OffsetUnit::Days),
    ] {
        let parsed = parse_reminder(&ReminderRequest {
            offset_amount: 5,
            offset_unit: unit.to_string(),
        })
        .unwrap();
        assert_eq!(parsed, ReminderSpec::new(5, expected));
    }
}

#[test]
fn test_parse_reminder_rejects_invalid() {
    let bad_unit = parse_reminder(&ReminderRequest {
        offset_amount: 5,
        offset_unit: "weeks".to_string(),
    });
    assert!(bad_unit.is_err());

    let bad_amount = parse_reminder(&ReminderRequest {
        offset_amount: 0,
        offset_unit: "minutes".to_string(),
    });
    assert!(bad_amount.is_err());
}

#[test]
fn test_parse_new_event() {
    let new = parse_new_event(create_request("2024-12-25", "14:30")).unwrap();
    assert_eq!(new.date.to_string(), "2024-12-25");
    assert_eq!(new.time, "14:30");
    assert_eq!(new.reminder, Some(ReminderSpec::new(30, OffsetUnit::Minutes)));
}

#[test]
fn test_parse_new_event_rejects_bad_input() {
    assert!(parse_new_event(create_request("not-a-date", "14:30")).is_err());
    assert!(parse_new_event(create_request("2024-12-25", "25:99")).is_err());

    let mut empty_name = create_request("2024-12-25", "14:30");
    empty_name.name = "  ".to_string();
    assert!(parse_new_event(empty_name).is_err());
}

#[test]
fn test_update_reminder_null_vs_absent() {
    // Explicit null removes the reminder
    let removed: UpdateEventRequest = serde_json::from_str(r#"{"reminder": null}"#).unwrap();
    let update = parse_update(removed).unwrap();
    assert_eq!(update.reminder, Some(None));

    // Absent field leaves it untouched
    let untouched: UpdateEventRequest = serde_json::from_str("{}").unwrap();
    let update = parse_update(untouched).unwrap();
    assert_eq!(update.reminder, None);
}

#[test]
fn test_parse_filter_sorts() {
    let by_date = parse_filter(ListQuery {
        sort: Some("date".to_string()),
        ..Default::default()
    })
    .unwrap();
    assert_eq!(by_date.sort, Some(EventSort::Date));

    let unknown = parse_filter(ListQuery {
        sort: Some("priority".to_string()),
        ..Default::default()
    });
    assert!(unknown.is_err());
}

mod http {
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::Router;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tempfile::TempDir;
    use tower::ServiceExt;

    use eventide_core::{
        EventStore, LogSink, NotificationSink, ReminderScheduler, Tokens, UserDirectory, UserStore,
    };

    struct TestApp {
        app: Router,
        scheduler: Arc<ReminderScheduler>,
        _dir: TempDir,
    }

    async fn create_test_app() -> TestApp {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("api_test.db");

        let events = Arc::new(EventStore::from_path(&path).await.unwrap());
        let users = Arc::new(UserStore::from_path(&path).await.unwrap());
        let tokens = Arc::new(Tokens::new("test-secret", 1));
        let scheduler = Arc::new(ReminderScheduler::new(
            users.clone() as Arc<dyn UserDirectory>,
            Arc::new(LogSink) as Arc<dyn NotificationSink>,
        ));

        let app =
            crate::server::build_router(events, users, tokens, scheduler.clone(), false);

        TestApp {
            app,
            scheduler,
            _dir: dir,
        }
    }

    async fn send_json(app: &Router, method: &str, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = builder.body(Body::from(body.to_string())).unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    async fn register(app: &Router) -> String {
        let (status, body) = send_json(
            app,
            "POST",
            "/api/v1/auth/register",
            None,
            json!({"username": "testuser", "password": "password123"}),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["data"]["token"].as_str().unwrap().to_string()
    }

    fn sample_event() -> Value {
        json!({
            "name": "Launch review",
            "description": "Quarterly check-in",
            "category": "Meetings",
            "date": "2099-06-15",
            "time": "14:30",
            "reminder": {"offset_amount": 30, "offset_unit": "minutes"}
        })
    }

    #[tokio::test]
    async fn test_events_require_authentication() {
        let ctx = create_test_app().await;
        let (status, _) = send_json(&ctx.app, "GET", "/api/v1/events", None, Value::Null).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_username() {
        let ctx = create_test_app().await;
        register(&ctx.app).await;

        let (status, _) = send_json(
            &ctx.app,
            "POST",
            "/api/v1/auth/register",
            None,
            json!({"username": "testuser", "password": "password123"}),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_login_round_trip() {
        let ctx = create_test_app().await;
        register(&ctx.app).await;

        let (status, body) = send_json(
            &ctx.app,
            "POST",
            "/api/v1/auth/login",
            None,
            json!({"username": "testuser", "password": "password123"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["data"]["token"].is_string());

        let (status, _) = send_json(
            &ctx.app,
            "POST",
            "/api/v1/auth/login",
            None,
            json!({"username": "testuser", "password": "wrong-password"}),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_create_event_arms_reminder() {
        let ctx = create_test_app().await;
        let token = register(&ctx.app).await;

        let (status, body) = send_json(
            &ctx.app,
            "POST",
            "/api/v1/events",
            Some(&token),
            sample_event(),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["name"], "Launch review");

        assert_eq!(ctx.scheduler.armed_count().await, 1);
    }

    #[tokio::test]
    async fn test_create_event_rejects_malformed_time() {
        let ctx = create_test_app().await;
        let token = register(&ctx.app).await;

        let mut event = sample_event();
        event["time"] = json!("half past two");
        let (status, _) =
            send_json(&ctx.app, "POST", "/api/v1/events", Some(&token), event).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(ctx.scheduler.armed_count().await, 0);
    }

    #[tokio::test]
    async fn test_past_reminder_creates_event_without_arming() {
        let ctx = create_test_app().await;
        let token = register(&ctx.app).await;

        let mut event = sample_event();
        event["date"] = json!("2020-01-01");
        let (status, _) =
            send_json(&ctx.app, "POST", "/api/v1/events", Some(&token), event).await;

        // The event mutation succeeds even though nothing is armed
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(ctx.scheduler.armed_count().await, 0);
    }

    #[tokio::test]
    async fn test_update_removing_reminder_disarms() {
        let ctx = create_test_app().await;
        let token = register(&ctx.app).await;

        let (_, created) = send_json(
            &ctx.app,
            "POST",
            "/api/v1/events",
            Some(&token),
            sample_event(),
        )
        .await;
        let id = created["data"]["id"].as_str().unwrap().to_string();
        assert_eq!(ctx.scheduler.armed_count().await, 1);

        let (status, body) = send_json(
            &ctx.app,
            "PUT",
            &format!("/api/v1/events/{}", id),
            Some(&token),
            json!({"reminder": null}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["data"]["reminder"].is_null());
        assert_eq!(ctx.scheduler.armed_count().await, 0);
    }

    #[tokio::test]
    async fn test_delete_event_disarms_and_404s_afterwards() {
        let ctx = create_test_app().await;
        let token = register(&ctx.app).await;

        let (_, created) = send_json(
            &ctx.app,
            "POST",
            "/api/v1/events",
            Some(&token),
            sample_event(),
        )
        .await;
        let id = created["data"]["id"].as_str().unwrap().to_string();

        let (status, _) = send_json(
            &ctx.app,
            "DELETE",
            &format!("/api/v1/events/{}", id),
            Some(&token),
            Value::Null,
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(ctx.scheduler.armed_count().await, 0);

        let (status, _) = send_json(
            &ctx.app,
            "GET",
            &format!("/api/v1/events/{}", id),
            Some(&token),
            Value::Null,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_filters_by_reminder_presence() {
        let ctx = create_test_app().await;
        let token = register(&ctx.app).await;

        send_json(&ctx.app, "POST", "/api/v1/events", Some(&token), sample_event()).await;

        let mut bare = sample_event();
        bare["name"] = json!("No reminder");
        bare["reminder"] = json!(null);
        send_json(&ctx.app, "POST", "/api/v1/events", Some(&token), bare).await;

        let (status, body) = send_json(
            &ctx.app,
            "GET",
            "/api/v1/events?has_reminder=true",
            Some(&token),
            Value::Null,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let list = body["data"].as_array().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0]["name"], "Launch review");
    }

    #[tokio::test]
    async fn test_categories_listing() {
        let ctx = create_test_app().await;
        let token = register(&ctx.app).await;

        let (status, body) = send_json(
            &ctx.app,
            "GET",
            "/api/v1/events/categories",
            Some(&token),
            Value::Null,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["data"]
            .as_array()
            .unwrap()
            .iter()
            .any(|c| c == "Meetings"));
    }
}
