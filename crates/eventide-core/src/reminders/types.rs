//! Reminder error types and collaborator traits

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::events::Event;
use crate::users::User;

/// Result type for reminder operations
pub type Result<T> = std::result::Result<T, ReminderError>;

/// Reminder error types
#[derive(Debug, Error)]
pub enum ReminderError {
    /// Time of day not parseable as hour:minute
    #[error("malformed time of day: {0:?} (expected HH:MM)")]
    MalformedTime(String),

    /// User lookup failed at fire time
    #[error("user lookup failed: {0}")]
    Lookup(String),

    /// Notification dispatch failed
    #[error("notification dispatch failed: {0}")]
    Dispatch(String),
}

/// Fire-time lookup of an event's owner
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Find a user by ID; `Ok(None)` when the user no longer exists
    async fn find_user(&self, user_id: Uuid) -> Result<Option<User>>;
}

/// Delivery mechanism invoked when a reminder timer elapses. Decides how a
/// notification is delivered; the scheduler only decides when.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Deliver a reminder notification
    async fn notify(&self, user: &User, event: &Event) -> Result<()>;
}

/// Sink that emits reminders as log lines
pub struct LogSink;

#[async_trait]
impl NotificationSink for LogSink {
    async fn notify(&self, user: &User, event: &Event) -> Result<()> {
        info!(
            username = %user.username,
            event_id = %event.id,
            "reminder: event {:?} is coming up at {} on {}",
            event.name,
            event.time,
            event.date,
        );
        Ok(())
    }
}
