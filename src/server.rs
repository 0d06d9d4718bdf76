//! Server bootstrap
//!
//! Opens the stores, rebuilds reminder timers from persisted events, then
//! binds the HTTP listener. Reconciliation runs to completion before any
//! request is accepted.

pub mod config;

use anyhow::Result;
use axum::{Extension, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use eventide_core::{
    EventStore, LogSink, NotificationSink, ReminderScheduler, Tokens, UserDirectory, UserStore,
};

use config::AppConfig;

/// Run the server until shutdown
pub async fn run() -> Result<()> {
    let config = AppConfig::from_env()?;

    let events = Arc::new(EventStore::from_path(&config.database_path).await?);
    let users = Arc::new(UserStore::from_path(&config.database_path).await?);
    let tokens = Arc::new(Tokens::new(&config.jwt_secret, config.token_expiry_hours));
    let scheduler = Arc::new(ReminderScheduler::new(
        users.clone() as Arc<dyn UserDirectory>,
        Arc::new(LogSink) as Arc<dyn NotificationSink>,
    ));

    let stored = events.list_all().await?;
    scheduler.reconcile_all(&stored).await;

    let app = build_router(events, users, tokens, scheduler, config.cors_enabled);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

/// Assemble the application router with its shared state
pub fn build_router(
    events: Arc<EventStore>,
    users: Arc<UserStore>,
    tokens: Arc<Tokens>,
    scheduler: Arc<ReminderScheduler>,
    cors_enabled: bool,
) -> Router {
    let mut router = crate::api::api_router()
        .layer(Extension(events))
        .layer(Extension(users))
        .layer(Extension(tokens))
        .layer(Extension(scheduler))
        .layer(TraceLayer::new_for_http());

    if cors_enabled {
        router = router.layer(CorsLayer::permissive());
    }

    router
}
