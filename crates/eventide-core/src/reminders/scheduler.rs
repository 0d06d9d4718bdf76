//! The reminder scheduler
//!
//! Owns the event-ID → armed-timer map. `schedule` and `cancel` are called
//! synchronously from the CRUD path and only touch the in-memory map; the
//! actual dispatch happens later on a spawned task when the timer elapses.
//!
//! The map is shared between the CRUD path and the firing tasks, guarded by
//! a single coarse lock. Each armed timer carries a generation token; a
//! firing task removes its map entry only while the token still matches, so
//! a fire racing a `cancel` or a re-`schedule` for the same event ID can
//! never leave a dangling or duplicate timer.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::time::compute_fire_time;
use super::types::{NotificationSink, Result, UserDirectory};
use crate::events::Event;

/// One armed, not-yet-fired timer
struct ArmedReminder {
    /// Generation token distinguishing re-arms of the same event ID
    seq: u64,
    /// Absolute instant the timer fires
    fire_at: DateTime<Utc>,
    /// Abortable handle to the sleeping task
    handle: JoinHandle<()>,
}

/// Schedules one background timer per event with a future-dated reminder and
/// invokes the notification sink when a timer elapses.
pub struct ReminderScheduler {
    armed: Arc<Mutex<HashMap<Uuid, ArmedReminder>>>,
    users: Arc<dyn UserDirectory>,
    sink: Arc<dyn NotificationSink>,
    next_seq: AtomicU64,
}

impl ReminderScheduler {
    /// Create a scheduler with its fire-time collaborators
    pub fn new(users: Arc<dyn UserDirectory>, sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            armed: Arc::new(Mutex::new(HashMap::new())),
            users,
            sink,
            next_seq: AtomicU64::new(0),
        }
    }

    /// Arm (or re-arm) the timer for an event.
    ///
    /// No timer is armed when the event has no reminder or its computed fire
    /// time is not strictly in the future; in both cases any previously armed
    /// timer for this event ID is cleared, so an update that drops or
    /// back-dates the reminder disarms it. Does not mutate the event record.
    pub async fn schedule(&self, event: &Event) -> Result<()> {
        let Some(spec) = event.reminder else {
            if self.disarm(event.id).await {
                debug!(event_id = %event.id, "reminder removed, timer disarmed");
            }
            return Ok(());
        };

        let fire_at = compute_fire_time(event.date, &event.time, &spec)?;
        let now = Utc::now();
        if fire_at <= now {
            self.disarm(event.id).await;
            debug!(event_id = %event.id, %fire_at, "fire time already past, leaving unarmed");
            return Ok(());
        }

        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        let delay = (fire_at - now).to_std().unwrap_or_default();

        let armed = Arc::clone(&self.armed);
        let users = Arc::clone(&self.users);
        let sink = Arc::clone(&self.sink);
        let event = event.clone();
        let event_id = event.id;

        // Hold the lock across spawn + insert so the firing task can never
        // observe the map before its own entry exists.
        let mut map = self.armed.lock().await;

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            // Lookup-and-cleanup is atomic under the same lock as
            // schedule/cancel; a stale generation means this timer was
            // replaced or canceled while we slept.
            let current = {
                let mut map = armed.lock().await;
                match map.get(&event_id) {
                    Some(entry) if entry.seq == seq => {
                        map.remove(&event_id);
                        true
                    }
                    _ => false,
                }
            };
            if !current {
                return;
            }

            match users.find_user(event.user_id).await {
                Ok(Some(user)) => {
                    if let Err(e) = sink.notify(&user, &event).await {
                        warn!(event_id = %event_id, error = %e, "notification dispatch failed");
                    }
                }
                Ok(None) => {
                    debug!(
                        event_id = %event_id,
                        user_id = %event.user_id,
                        "owner no longer exists, skipping notification"
                    );
                }
                Err(e) => {
                    warn!(event_id = %event_id, error = %e, "owner lookup failed, skipping notification");
                }
            }
        });

        if let Some(previous) = map.insert(
            event_id,
            ArmedReminder {
                seq,
                fire_at,
                handle,
            },
        ) {
            previous.handle.abort();
            debug!(event_id = %event_id, %fire_at, "re-armed timer");
        } else {
            debug!(event_id = %event_id, %fire_at, "armed timer");
        }

        Ok(())
    }

    /// Cancel the timer for an event, if one is armed. Idempotent.
    pub async fn cancel(&self, event_id: Uuid) {
        if self.disarm(event_id).await {
            debug!(event_id = %event_id, "timer canceled");
        }
    }

    /// Rebuild timers from persisted events. Called once at startup, before
    /// HTTP traffic is accepted; the future-only and reminder-presence checks
    /// are applied per event by `schedule`. Returns the number of timers
    /// armed afterwards.
    pub async fn reconcile_all(&self, events: &[Event]) -> usize {
        for event in events {
            if let Err(e) = self.schedule(event).await {
                warn!(event_id = %event.id, error = %e, "skipping reminder with invalid time data");
            }
        }

        let armed = self.armed.lock().await.len();
        info!(armed, total = events.len(), "rebuilt reminder timers");
        armed
    }

    /// Number of currently armed timers
    pub async fn armed_count(&self) -> usize {
        self.armed.lock().await.len()
    }

    /// Whether a timer is armed for this event ID
    pub async fn is_armed(&self, event_id: Uuid) -> bool {
        self.armed.lock().await.contains_key(&event_id)
    }

    /// The armed fire instant for this event ID, if any
    pub async fn fire_time(&self, event_id: Uuid) -> Option<DateTime<Utc>> {
        self.armed.lock().await.get(&event_id).map(|e| e.fire_at)
    }

    async fn disarm(&self, event_id: Uuid) -> bool {
        let mut map = self.armed.lock().await;
        match map.remove(&event_id) {
            Some(entry) => {
                entry.handle.abort();
                true
            }
            None => false,
        }
    }
}
