//! Server configuration types
//!
//! Configuration is environment-driven (a `.env` file is loaded at startup).

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Bind host
    #[serde(default = "default_host")]
    pub host: String,
    /// Bind port
    #[serde(default = "default_port")]
    pub port: u16,
    /// SQLite database path
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
    /// Secret for signing bearer tokens
    pub jwt_secret: String,
    /// Bearer token lifetime in hours
    #[serde(default = "default_token_expiry_hours")]
    pub token_expiry_hours: i64,
    /// Enable permissive CORS (development convenience)
    #[serde(default)]
    pub cors_enabled: bool,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_database_path() -> PathBuf {
    PathBuf::from("data/eventide.db")
}

fn default_token_expiry_hours() -> i64 {
    24
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let jwt_secret = match std::env::var("EVENTIDE_JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ => bail!("EVENTIDE_JWT_SECRET must be set to a non-empty secret"),
        };

        let port = match std::env::var("EVENTIDE_PORT") {
            Ok(raw) => raw.parse()?,
            Err(_) => default_port(),
        };

        let token_expiry_hours = match std::env::var("EVENTIDE_TOKEN_EXPIRY_HOURS") {
            Ok(raw) => raw.parse()?,
            Err(_) => default_token_expiry_hours(),
        };

        Ok(Self {
            host: std::env::var("EVENTIDE_HOST").unwrap_or_else(|_| default_host()),
            port,
            database_path: std::env::var("EVENTIDE_DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_database_path()),
            jwt_secret,
            token_expiry_hours,
            cors_enabled: std::env::var("EVENTIDE_CORS_ENABLED")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        })
    }

    /// Socket address string for the listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
