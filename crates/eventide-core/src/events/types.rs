//! Event type definitions

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::{Error, Result};

/// Unit for a reminder offset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OffsetUnit {
    /// Minutes before the event
    Minutes,
    /// Hours before the event
    Hours,
    /// Days before the event
    Days,
}

/// A relative duration subtracted from the event's date-time to produce the
/// notification fire time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderSpec {
    /// How many units before the event to fire (strictly positive)
    pub offset_amount: i64,
    /// Unit of the offset
    pub offset_unit: OffsetUnit,
}

impl ReminderSpec {
    /// Create a new reminder offset
    pub fn new(offset_amount: i64, offset_unit: OffsetUnit) -> Self {
        Self {
            offset_amount,
            offset_unit,
        }
    }

    /// The offset as a calendar-safe duration
    pub fn offset(&self) -> Duration {
        match self.offset_unit {
            OffsetUnit::Minutes => Duration::minutes(self.offset_amount),
            OffsetUnit::Hours => Duration::hours(self.offset_amount),
            OffsetUnit::Days => Duration::days(self.offset_amount),
        }
    }
}

/// A calendar event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Unique event ID
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// Human-readable event name
    pub name: String,
    /// Event description
    pub description: Option<String>,
    /// Category label
    pub category: Option<String>,
    /// Calendar date of occurrence
    pub date: NaiveDate,
    /// Time of day of occurrence, `HH:MM` (validated at the API boundary)
    pub time: String,
    /// Optional reminder offset; absence means no reminder is desired
    pub reminder: Option<ReminderSpec>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Create a new event owned by `user_id`
    pub fn new(user_id: Uuid, new: NewEvent) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            name: new.name,
            description: new.description,
            category: new.category,
            date: new.date,
            time: new.time,
            reminder: new.reminder,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial update, bumping `updated_at`
    pub fn apply(&mut self, update: UpdateEvent) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(category) = update.category {
            self.category = Some(category);
        }
        if let Some(date) = update.date {
            self.date = date;
        }
        if let Some(time) = update.time {
            self.time = time;
        }
        if let Some(reminder) = update.reminder {
            self.reminder = reminder;
        }
        self.updated_at = Utc::now();
    }
}

/// Fields for creating an event
#[derive(Debug, Clone)]
pub struct NewEvent {
    /// Event name
    pub name: String,
    /// Event description
    pub description: Option<String>,
    /// Category label
    pub category: Option<String>,
    /// Calendar date
    pub date: NaiveDate,
    /// Time of day, `HH:MM`
    pub time: String,
    /// Optional reminder offset
    pub reminder: Option<ReminderSpec>,
}

/// Partial update for an event. `reminder: Some(None)` removes the reminder;
/// `None` leaves it untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateEvent {
    /// New name
    pub name: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New category
    pub category: Option<String>,
    /// New date
    pub date: Option<NaiveDate>,
    /// New time of day
    pub time: Option<String>,
    /// Reminder change (outer = whether to touch, inner = new value)
    pub reminder: Option<Option<ReminderSpec>>,
}

/// Internal row type for database queries
#[derive(FromRow)]
pub(super) struct EventRow {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub date: String,
    pub time: String,
    pub reminder_json: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<EventRow> for Event {
    type Error = Error;

    fn try_from(row: EventRow) -> Result<Self> {
        let reminder = row
            .reminder_json
            .as_deref()
            .map(serde_json::from_str)
            .transpose()?;

        Ok(Event {
            id: Uuid::parse_str(&row.id)
                .map_err(|e| Error::InvalidRecord(format!("invalid event ID: {}", e)))?,
            user_id: Uuid::parse_str(&row.user_id)
                .map_err(|e| Error::InvalidRecord(format!("invalid user ID: {}", e)))?,
            name: row.name,
            description: row.description,
            category: row.category,
            date: row
                .date
                .parse()
                .map_err(|e| Error::InvalidRecord(format!("invalid event date: {}", e)))?,
            time: row.time,
            reminder,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
