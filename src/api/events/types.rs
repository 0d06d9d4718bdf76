//! Request/response types and boundary validation for the events API
//!
//! Validation happens here so the scheduler can assume well-formed dates and
//! times; a request that fails any check is rejected with a 400 before the
//! event store or scheduler is touched.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use eventide_core::reminders::parse_time_of_day;
use eventide_core::{Event, NewEvent, OffsetUnit, ReminderSpec, UpdateEvent};

/// Reminder offset as submitted by clients
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ReminderRequest {
    pub offset_amount: i64,
    pub offset_unit: String,
}

/// Reminder offset as returned to clients
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReminderView {
    pub offset_amount: i64,
    pub offset_unit: &'static str,
}

impl From<ReminderSpec> for ReminderView {
    fn from(spec: ReminderSpec) -> Self {
        let offset_unit = match spec.offset_unit {
            OffsetUnit::Minutes => "minutes",
            OffsetUnit::Hours => "hours",
            OffsetUnit::Days => "days",
        };
        Self {
            offset_amount: spec.offset_amount,
            offset_unit,
        }
    }
}

/// Event view for API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct EventView {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub date: NaiveDate,
    pub time: String,
    pub reminder: Option<ReminderView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to create an event
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateEventRequest {
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub date: String,
    pub time: String,
    pub reminder: Option<ReminderRequest>,
}

/// Request to update an event. `"reminder": null` removes the reminder;
/// omitting the field leaves it untouched.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateEventRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub reminder: Option<Option<ReminderRequest>>,
}

fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// List query parameters
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
    pub has_reminder: Option<bool>,
    pub sort: Option<String>,
}

/// Convert an event to its API view
pub fn event_to_view(event: &Event) -> EventView {
    EventView {
        id: event.id,
        name: event.name.clone(),
        description: event.description.clone(),
        category: event.category.clone(),
        date: event.date,
        time: event.time.clone(),
        reminder: event.reminder.map(ReminderView::from),
        created_at: event.created_at,
        updated_at: event.updated_at,
    }
}

/// Parse a reminder request, validating unit and amount
pub fn parse_reminder(request: &ReminderRequest) -> Result<ReminderSpec, String> {
    let unit = match request.offset_unit.as_str() {
        "minutes" => OffsetUnit::Minutes,
        "hours" => OffsetUnit::Hours,
        "days" => OffsetUnit::Days,
        other => {
            return Err(format!(
                "invalid offset unit {:?} (expected minutes, hours, or days)",
                other
            ))
        }
    };
    if request.offset_amount <= 0 {
        return Err("offset amount must be a positive integer".to_string());
    }
    Ok(ReminderSpec::new(request.offset_amount, unit))
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    raw.parse()
        .map_err(|_| format!("invalid date {:?} (expected YYYY-MM-DD)", raw))
}

fn validate_time(raw: &str) -> Result<(), String> {
    parse_time_of_day(raw).map(|_| ()).map_err(|e| e.to_string())
}

/// Validate a create request into store-ready fields
pub fn parse_new_event(request: CreateEventRequest) -> Result<NewEvent, String> {
    if request.name.trim().is_empty() {
        return Err("name must not be empty".to_string());
    }
    let date = parse_date(&request.date)?;
    validate_time(&request.time)?;
    let reminder = request.reminder.as_ref().map(parse_reminder).transpose()?;

    Ok(NewEvent {
        name: request.name,
        description: request.description,
        category: request.category,
        date,
        time: request.time,
        reminder,
    })
}

/// Validate an update request into a partial update
pub fn parse_update(request: UpdateEventRequest) -> Result<UpdateEvent, String> {
    if let Some(name) = &request.name {
        if name.trim().is_empty() {
            return Err("name must not be empty".to_string());
        }
    }
    let date = request.date.as_deref().map(parse_date).transpose()?;
    if let Some(time) = &request.time {
        validate_time(time)?;
    }
    let reminder = match request.reminder {
        Some(Some(r)) => Some(Some(parse_reminder(&r)?)),
        Some(None) => Some(None),
        None => None,
    };

    Ok(UpdateEvent {
        name: request.name,
        description: request.description,
        category: request.category,
        date,
        time: request.time,
        reminder,
    })
}

/// Parse list query parameters into store filters
pub fn parse_filter(query: ListQuery) -> Result<eventide_core::events::EventFilter, String> {
    let sort = match query.sort.as_deref() {
        None => None,
        Some("date") => Some(eventide_core::events::EventSort::Date),
        Some("category") => Some(eventide_core::events::EventSort::Category),
        Some(other) => return Err(format!("invalid sort {:?} (expected date or category)", other)),
    };

    Ok(eventide_core::events::EventFilter {
        category: query.category,
        has_reminder: query.has_reminder,
        sort,
    })
}
