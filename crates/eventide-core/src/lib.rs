//! Eventide Core - Event Registry & Reminder Engine
//!
//! This crate provides the domain logic for the Eventide server, including:
//! - Events: Calendar event records with optional reminder offsets
//! - Users: Account storage and fire-time user lookups
//! - Auth: Password hashing and bearer token issuance/validation
//! - Reminders: The reminder scheduler that arms one timer per event and
//!   dispatches notifications when a timer elapses

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod auth;
pub mod error;
pub mod events;
pub mod reminders;
pub mod users;

pub use auth::{AuthError, Claims, Tokens};
pub use error::{Error, Result};
pub use events::{Event, EventStore, NewEvent, OffsetUnit, ReminderSpec, UpdateEvent};
pub use reminders::{
    LogSink, NotificationSink, ReminderError, ReminderScheduler, UserDirectory,
};
pub use users::{User, UserStore};
