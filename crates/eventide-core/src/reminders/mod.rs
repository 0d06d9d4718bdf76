//! Reminder scheduling
//!
//! Converts an event's date/time and relative offset into an absolute fire
//! time, arms one background timer per event, and dispatches a notification
//! when a timer elapses.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────┐
//! │ ReminderScheduler │  schedule / cancel / reconcile_all
//! └─────────┬─────────┘
//!           │ timer elapses
//!           ▼
//! ┌───────────────────┐
//! │   UserDirectory   │  owner lookup at fire time
//! └─────────┬─────────┘
//!           ▼
//! ┌───────────────────┐
//! │ NotificationSink  │  notify(user, event)
//! └───────────────────┘
//! ```
//!
//! The scheduler holds at most one armed timer per event ID. Timers are
//! in-memory only; `reconcile_all` rebuilds them from the event store after
//! a restart.

mod scheduler;
mod time;
mod types;

pub use scheduler::ReminderScheduler;
pub use time::{compute_fire_time, parse_time_of_day};
pub use types::{LogSink, NotificationSink, ReminderError, UserDirectory};
