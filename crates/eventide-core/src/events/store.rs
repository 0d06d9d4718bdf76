//! Event storage using SQLite
//!
//! Persists events for durability across restarts; the reminder scheduler is
//! rebuilt from this store at startup.

use chrono::Utc;
use sqlx::{sqlite::SqlitePoolOptions, Pool, Sqlite};
use std::path::Path;
use uuid::Uuid;

use super::types::{Event, EventRow};
use crate::error::{Error, Result};

/// Sort order for event listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventSort {
    /// Chronological by event date, then time of day
    Date,
    /// Alphabetical by category
    Category,
}

/// Filters for listing a user's events
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Only events in this category
    pub category: Option<String>,
    /// Only events with (true) or without (false) a reminder
    pub has_reminder: Option<bool>,
    /// Sort order; defaults to newest first
    pub sort: Option<EventSort>,
}

/// SQLite-based event store
pub struct EventStore {
    pool: Pool<Sqlite>,
}

impl EventStore {
    /// Create a store on an existing pool and run migrations
    pub async fn new(pool: Pool<Sqlite>) -> Result<Self> {
        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Create a new store from a database path
    pub async fn from_path(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::InvalidRecord(format!("failed to create directory: {}", e)))?;
        }

        let url = format!("sqlite:{}?mode=rwc", path.display());
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&url)
            .await?;

        Self::new(pool).await
    }

    async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS events (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                name TEXT NOT NULL,
                description TEXT,
                category TEXT,
                date TEXT NOT NULL,
                time TEXT NOT NULL,
                reminder_json TEXT,
                created_at TIMESTAMP NOT NULL,
                updated_at TIMESTAMP NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_events_user ON events(user_id)")
            .execute(&self.pool)
            .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_events_date ON events(date)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Insert a new event
    pub async fn create(&self, event: &Event) -> Result<()> {
        let reminder_json = event
            .reminder
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        sqlx::query(
            r#"
            INSERT INTO events (
                id, user_id, name, description, category,
                date, time, reminder_json, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(event.id.to_string())
        .bind(event.user_id.to_string())
        .bind(&event.name)
        .bind(&event.description)
        .bind(&event.category)
        .bind(event.date.to_string())
        .bind(&event.time)
        .bind(reminder_json)
        .bind(event.created_at)
        .bind(event.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get an event by ID, scoped to its owner
    pub async fn get(&self, user_id: Uuid, id: Uuid) -> Result<Event> {
        let row: EventRow = sqlx::query_as("SELECT * FROM events WHERE id = ? AND user_id = ?")
            .bind(id.to_string())
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await?
            .ok_or(Error::EventNotFound(id))?;

        row.try_into()
    }

    /// Update an event, scoped to its owner
    pub async fn update(&self, event: &Event) -> Result<()> {
        let reminder_json = event
            .reminder
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let result = sqlx::query(
            r#"
            UPDATE events SET
                name = ?, description = ?, category = ?,
                date = ?, time = ?, reminder_json = ?, updated_at = ?
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(&event.name)
        .bind(&event.description)
        .bind(&event.category)
        .bind(event.date.to_string())
        .bind(&event.time)
        .bind(reminder_json)
        .bind(Utc::now())
        .bind(event.id.to_string())
        .bind(event.user_id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::EventNotFound(event.id));
        }

        Ok(())
    }

    /// Delete an event, scoped to its owner
    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM events WHERE id = ? AND user_id = ?")
            .bind(id.to_string())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::EventNotFound(id));
        }

        Ok(())
    }

    /// List a user's events with optional filters
    pub async fn list(&self, user_id: Uuid, filter: &EventFilter) -> Result<Vec<Event>> {
        let mut sql = String::from("SELECT * FROM events WHERE user_id = ?");

        if filter.category.is_some() {
            sql.push_str(" AND category = ?");
        }
        match filter.has_reminder {
            Some(true) => sql.push_str(" AND reminder_json IS NOT NULL"),
            Some(false) => sql.push_str(" AND reminder_json IS NULL"),
            None => {}
        }
        match filter.sort {
            Some(EventSort::Date) => sql.push_str(" ORDER BY date ASC, time ASC"),
            Some(EventSort::Category) => sql.push_str(" ORDER BY category ASC, date ASC"),
            None => sql.push_str(" ORDER BY created_at DESC"),
        }

        let mut query = sqlx::query_as::<_, EventRow>(&sql).bind(user_id.to_string());
        if let Some(category) = &filter.category {
            query = query.bind(category);
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.into_iter().map(|r| r.try_into()).collect()
    }

    /// List every stored event, for rebuilding reminder timers at startup
    pub async fn list_all(&self) -> Result<Vec<Event>> {
        let rows: Vec<EventRow> = sqlx::query_as("SELECT * FROM events ORDER BY date ASC")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }
}
