//! User storage using SQLite

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqlitePoolOptions, FromRow, Pool, Sqlite};
use std::path::Path;
use uuid::Uuid;

use super::User;
use crate::error::{Error, Result};
use crate::reminders::{ReminderError, UserDirectory};

/// Internal row type for database queries
#[derive(FromRow)]
struct UserRow {
    id: String,
    username: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = Error;

    fn try_from(row: UserRow) -> Result<Self> {
        Ok(User {
            id: Uuid::parse_str(&row.id)
                .map_err(|e| Error::InvalidRecord(format!("invalid user ID: {}", e)))?,
            username: row.username,
            password_hash: row.password_hash,
            created_at: row.created_at,
        })
    }
}

/// SQLite-based user store
pub struct UserStore {
    pool: Pool<Sqlite>,
}

impl UserStore {
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
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                username TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                created_at TIMESTAMP NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert a new user; rejects duplicate usernames
    pub async fn create(&self, user: &User) -> Result<()> {
        if self.find_by_username(&user.username).await?.is_some() {
            return Err(Error::UsernameTaken(user.username.clone()));
        }

        sqlx::query(
            "INSERT INTO users (id, username, password_hash, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(user.id.to_string())
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get a user by ID
    pub async fn get(&self, id: Uuid) -> Result<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as("SELECT * FROM users WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Find a user by username
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        row.map(TryInto::try_into).transpose()
    }
}

#[async_trait]
impl UserDirectory for UserStore {
    async fn find_user(
        &self,
        user_id: Uuid,
    ) -> std::result::Result<Option<User>, ReminderError> {
        self.get(user_id)
            .await
            .map_err(|e| ReminderError::Lookup(e.to_string()))
    }
}
