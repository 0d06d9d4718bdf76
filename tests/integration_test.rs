//! Integration tests for Eventide
//!
//! These tests exercise eventide-core end to end against a real SQLite
//! file: stores, fire-time computation, and the reminder scheduler,
//! including the reconcile pass a fresh process runs at startup.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use tempfile::TempDir;
use uuid::Uuid;

use eventide_core::reminders::compute_fire_time;
use eventide_core::{
    Event, EventStore, NewEvent, NotificationSink, OffsetUnit, ReminderError, ReminderScheduler,
    ReminderSpec, User, UserDirectory, UserStore,
};

// ============================================================================
// Helpers
// ============================================================================

struct CountingSink {
    sent: std::sync::Mutex<usize>,
}

impl CountingSink {
    fn new() -> Self {
        Self {
            sent: std::sync::Mutex::new(0),
        }
    }
}

#[async_trait]
impl NotificationSink for CountingSink {
    async fn notify(&self, _user: &User, _event: &Event) -> Result<(), ReminderError> {
        *self.sent.lock().unwrap() += 1;
        Ok(())
    }
}

struct StoreDirectory {
    users: Arc<UserStore>,
}

#[async_trait]
impl UserDirectory for StoreDirectory {
    async fn find_user(&self, user_id: Uuid) -> Result<Option<User>, ReminderError> {
        self.users
            .get(user_id)
            .await
            .map_err(|err| ReminderError::Lookup(err.to_string()))
    }
}

async fn create_user(users: &UserStore, username: &str) -> User {
    let user = User::new(username, "not-a-real-hash");
    users.create(&user).await.unwrap();
    user
}

fn new_event(name: &str, date: NaiveDate, time: &str, reminder: Option<ReminderSpec>) -> NewEvent {
    NewEvent {
        name: name.to_string(),
        description: None,
        category: Some("Meetings".to_string()),
        date,
        time: time.to_string(),
        reminder,
    }
}

/// An event whose reminder fires comfortably in the future.
fn future_event(name: &str) -> NewEvent {
    let when = Utc::now() + Duration::days(30);
    new_event(
        name,
        when.date_naive(),
        "12:00",
        Some(ReminderSpec::new(30, OffsetUnit::Minutes)),
    )
}

// ============================================================================
// Store Integration Tests
// ============================================================================

#[tokio::test]
async fn test_event_round_trip_through_sqlite() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("eventide.db");

    let users = UserStore::from_path(&path).await.unwrap();
    let events = EventStore::from_path(&path).await.unwrap();
    let user = create_user(&users, "alice").await;

    let date = NaiveDate::from_ymd_opt(2099, 12, 25).unwrap();
    let spec = ReminderSpec::new(2, OffsetUnit::Hours);
    let event = Event::new(user.id, new_event("Holiday dinner", date, "18:00", Some(spec)));
    events.create(&event).await.unwrap();

    let loaded = events.get(user.id, event.id).await.unwrap();
    assert_eq!(loaded.name, "Holiday dinner");
    assert_eq!(loaded.reminder, Some(spec));

    // The persisted copy still produces the same fire time
    let fire_at = compute_fire_time(loaded.date, &loaded.time, &spec).unwrap();
    assert_eq!(fire_at.to_rfc3339(), "2099-12-25T16:00:00+00:00");
}

#[tokio::test]
async fn test_events_are_scoped_to_their_owner() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("eventide.db");

    let users = UserStore::from_path(&path).await.unwrap();
    let events = EventStore::from_path(&path).await.unwrap();
    let alice = create_user(&users, "alice").await;
    let bob = create_user(&users, "bob").await;

    let event = Event::new(alice.id, future_event("Standup"));
    events.create(&event).await.unwrap();

    assert!(events.get(bob.id, event.id).await.is_err());
    assert!(events.delete(bob.id, event.id).await.is_err());
    assert!(events.get(alice.id, event.id).await.is_ok());
}

// ============================================================================
// Startup Reconcile Tests
// ============================================================================

#[tokio::test]
async fn test_reconcile_rearms_persisted_reminders_after_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("eventide.db");

    let user_id;
    {
        let users = UserStore::from_path(&path).await.unwrap();
        let events = EventStore::from_path(&path).await.unwrap();
        let user = create_user(&users, "alice").await;
        user_id = user.id;

        for new in [
            future_event("Design review"),
            new_event(
                "No reminder",
                NaiveDate::from_ymd_opt(2099, 1, 1).unwrap(),
                "09:00",
                None,
            ),
            new_event(
                "Already passed",
                NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
                "09:00",
                Some(ReminderSpec::new(10, OffsetUnit::Minutes)),
            ),
        ] {
            events.create(&Event::new(user.id, new)).await.unwrap();
        }
    }

    // Simulate a fresh process: reopen the database and rebuild timers
    let users = Arc::new(UserStore::from_path(&path).await.unwrap());
    let events = EventStore::from_path(&path).await.unwrap();
    let scheduler = ReminderScheduler::new(
        Arc::new(StoreDirectory { users }) as Arc<dyn UserDirectory>,
        Arc::new(CountingSink::new()) as Arc<dyn NotificationSink>,
    );

    let stored = events.list_all().await.unwrap();
    assert_eq!(stored.len(), 3);

    let armed = scheduler.reconcile_all(&stored).await;
    assert_eq!(armed, 1);
    assert_eq!(scheduler.armed_count().await, 1);

    // Only the future-reminder event holds a timer
    let design_review = stored.iter().find(|e| e.name == "Design review").unwrap();
    assert!(scheduler.is_armed(design_review.id).await);
    assert_eq!(design_review.user_id, user_id);
}

#[tokio::test]
async fn test_cancel_after_delete_leaves_nothing_armed() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("eventide.db");

    let users = Arc::new(UserStore::from_path(&path).await.unwrap());
    let events = EventStore::from_path(&path).await.unwrap();
    let user = create_user(&users, "alice").await;

    let scheduler = ReminderScheduler::new(
        Arc::new(StoreDirectory {
            users: users.clone(),
        }) as Arc<dyn UserDirectory>,
        Arc::new(CountingSink::new()) as Arc<dyn NotificationSink>,
    );

    let event = Event::new(user.id, future_event("Retro"));
    events.create(&event).await.unwrap();
    scheduler.schedule(&event).await.unwrap();
    assert_eq!(scheduler.armed_count().await, 1);

    events.delete(user.id, event.id).await.unwrap();
    scheduler.cancel(event.id).await;
    assert_eq!(scheduler.armed_count().await, 0);

    // Cancelling again is harmless
    scheduler.cancel(event.id).await;
    assert_eq!(scheduler.armed_count().await, 0);
}
