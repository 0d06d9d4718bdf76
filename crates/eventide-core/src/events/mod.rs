//! Event records and their SQLite store
//!
//! An event is a dated entry owned by one user. It may carry a reminder
//! offset; the reminder scheduler reads events, it never owns them.

mod store;
mod types;

pub use store::{EventFilter, EventSort, EventStore};
pub use types::{Event, NewEvent, OffsetUnit, ReminderSpec, UpdateEvent};

/// Categories an event may be filed under.
pub const CATEGORIES: &[&str] = &["Work", "Personal", "Meetings", "Birthdays", "Other"];
