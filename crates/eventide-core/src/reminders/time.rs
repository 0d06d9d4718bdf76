//! Fire-time computation
//!
//! Event date and time-of-day are interpreted as UTC wall-clock. Offset
//! subtraction goes through chrono so month and year boundaries roll over
//! correctly.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};

use super::types::{ReminderError, Result};
use crate::events::ReminderSpec;

/// Parse an event's time of day (`HH:MM`, seconds tolerated)
pub fn parse_time_of_day(time: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(time, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M:%S"))
        .map_err(|_| ReminderError::MalformedTime(time.to_string()))
}

/// Compute the absolute instant a reminder should fire: the event's combined
/// date-time minus the reminder offset. Pure; the only failure is a
/// malformed time of day, which boundary validation should have prevented.
pub fn compute_fire_time(
    date: NaiveDate,
    time: &str,
    spec: &ReminderSpec,
) -> Result<DateTime<Utc>> {
    let time_of_day = parse_time_of_day(time)?;
    let instant = Utc.from_utc_datetime(&date.and_time(time_of_day));
    Ok(instant - spec.offset())
}
