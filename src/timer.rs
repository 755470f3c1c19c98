// SPDX-License-Identifier: MIT

//! Running-timer reconciliation.
//!
//! The engine presents a single "is a timer running, and for how long" view,
//! reconciling three inputs: the server's running entry (authoritative), a
//! durable local snapshot (a restoration hint consumed once at startup), and
//! a 1-second local tick while running.
//!
//! Elapsed time is always recomputed from the entry's absolute start
//! timestamp. It is never accumulated tick by tick, so a suspended process
//! shows the correct value immediately on resume.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::api::ApiClient;
use crate::error::{AppError, Result};
use crate::models::{StartTimer, TimeEntry};
use crate::store::{keys, StateStore};

/// Observable engine state.
#[derive(Debug, Clone, PartialEq)]
pub enum TimerState {
    /// Before the first reconciliation with the server.
    Unknown,
    /// No running entry.
    Idle,
    /// An entry is active and the clock is ticking.
    Running {
        entry: TimeEntry,
        elapsed_secs: i64,
    },
}

impl TimerState {
    pub fn is_running(&self) -> bool {
        matches!(self, TimerState::Running { .. })
    }
}

/// Single authoritative view of the running timer for this process.
///
/// Other processes sharing the same state store are not synchronized live;
/// each reconciles against the server on its own schedule.
pub struct TimerEngine {
    api: ApiClient,
    store: Arc<dyn StateStore>,
    state: Arc<watch::Sender<TimerState>>,
    ticker: Mutex<Option<JoinHandle<()>>>,
    /// Serializes sync/start/stop so transitions interleave only at their
    /// network boundaries.
    op: tokio::sync::Mutex<()>,
}

impl TimerEngine {
    pub fn new(api: ApiClient, store: Arc<dyn StateStore>) -> Self {
        let (state, _) = watch::channel(TimerState::Unknown);
        Self {
            api,
            store,
            state: Arc::new(state),
            ticker: Mutex::new(None),
            op: tokio::sync::Mutex::new(()),
        }
    }

    /// Current state, with elapsed recomputed from the start timestamp.
    pub fn state(&self) -> TimerState {
        match self.state.borrow().clone() {
            TimerState::Running { entry, .. } => {
                let elapsed_secs = elapsed_since(entry.start_time);
                TimerState::Running {
                    entry,
                    elapsed_secs,
                }
            }
            other => other,
        }
    }

    /// Watch for state changes (one update per tick while running).
    pub fn subscribe(&self) -> watch::Receiver<TimerState> {
        self.state.subscribe()
    }

    /// Apply the durable snapshot as a provisional display state.
    ///
    /// Runs independently of [`Self::sync`] and only takes effect while the
    /// state is still `Unknown`; whichever order the two resolve in, the
    /// server result wins.
    pub fn restore_snapshot(&self) {
        let Some(entry) = load_snapshot(self.store.as_ref()) else {
            return;
        };
        if !entry.is_running {
            clear_snapshot(self.store.as_ref());
            return;
        }

        let mut applied = false;
        self.state.send_modify(|state| {
            if matches!(state, TimerState::Unknown) {
                let elapsed_secs = elapsed_since(entry.start_time);
                *state = TimerState::Running {
                    entry: entry.clone(),
                    elapsed_secs,
                };
                applied = true;
            }
        });

        if applied {
            tracing::debug!(entry_id = %entry.id, "Restored provisional running timer from snapshot");
            self.spawn_ticker();
        }
    }

    /// Reconcile with the server's running entry.
    ///
    /// A fetch failure is non-fatal for display purposes: the engine falls
    /// back to `Idle` (clearing the snapshot) and the error is returned so
    /// the caller can surface a notice.
    pub async fn sync(&self) -> Result<TimerState> {
        let _op = self.op.lock().await;
        match self.api.running_entry().await {
            Ok(Some(entry)) => {
                tracing::debug!(entry_id = %entry.id, "Server reports a running timer");
                self.adopt_running(entry);
            }
            Ok(None) => {
                self.enter_idle();
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch running timer, defaulting to idle");
                self.enter_idle();
                return Err(e);
            }
        }
        Ok(self.state())
    }

    /// Start a timer. The engine stays `Idle` unless the server confirms.
    pub async fn start(&self, request: StartTimer) -> Result<TimeEntry> {
        if request.project_id.is_nil() {
            return Err(AppError::Validation(
                "a project is required to start a timer".to_string(),
            ));
        }

        let _op = self.op.lock().await;
        if self.state.borrow().is_running() {
            return Err(AppError::TimerAlreadyRunning);
        }

        let entry = self.api.start_timer(&request).await?;
        tracing::info!(entry_id = %entry.id, project = %entry.project_name, "Timer started");
        self.adopt_running(entry.clone());
        Ok(entry)
    }

    /// Stop the running timer and return the finalized duration in seconds.
    ///
    /// On failure the engine stays `Running` with the same entry: the server
    /// owns the stop boundary, so local state is never cleared optimistically.
    pub async fn stop(&self) -> Result<i64> {
        let _op = self.op.lock().await;
        let entry_id = match &*self.state.borrow() {
            TimerState::Running { entry, .. } => entry.id,
            _ => return Err(AppError::NoRunningTimer),
        };

        let stopped = self.api.stop_timer(entry_id).await?;
        self.enter_idle();

        let duration = stopped.duration_seconds.unwrap_or_else(|| {
            stopped
                .end_time
                .map(|end| (end - stopped.start_time).num_seconds())
                .unwrap_or(0)
        });
        tracing::info!(entry_id = %entry_id, duration_seconds = duration, "Timer stopped");
        Ok(duration)
    }

    /// Adopt a server-confirmed running entry.
    fn adopt_running(&self, entry: TimeEntry) {
        save_snapshot(self.store.as_ref(), &entry);
        let elapsed_secs = elapsed_since(entry.start_time);
        self.state.send_replace(TimerState::Running {
            entry,
            elapsed_secs,
        });
        self.spawn_ticker();
    }

    /// Transition to `Idle`: no entry, no snapshot, no ticker.
    fn enter_idle(&self) {
        clear_snapshot(self.store.as_ref());
        self.stop_ticker();
        self.state.send_replace(TimerState::Idle);
    }

    /// (Re)start the 1-second display tick.
    fn spawn_ticker(&self) {
        let state = Arc::clone(&self.state);
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            // Missed ticks are irrelevant: elapsed comes from the start
            // timestamp, not a counter.
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            interval.tick().await; // completes immediately
            loop {
                interval.tick().await;
                // Updating under the channel lock cannot race a concurrent
                // transition to idle back into a running update.
                let still_running = state.send_if_modified(|current| match current {
                    TimerState::Running {
                        entry,
                        elapsed_secs,
                    } => {
                        *elapsed_secs = elapsed_since(entry.start_time);
                        true
                    }
                    _ => false,
                });
                if !still_running {
                    break;
                }
            }
        });

        let mut slot = self.ticker.lock().unwrap();
        if let Some(old) = slot.replace(handle) {
            old.abort();
        }
    }

    fn stop_ticker(&self) {
        if let Some(handle) = self.ticker.lock().unwrap().take() {
            handle.abort();
        }
    }
}

impl Drop for TimerEngine {
    fn drop(&mut self) {
        self.stop_ticker();
    }
}

/// Whole seconds since `start`, floored, never negative.
pub fn elapsed_since(start: DateTime<Utc>) -> i64 {
    (Utc::now() - start).num_seconds().max(0)
}

/// Render a second count as `H:MM:SS`.
pub fn format_elapsed(secs: i64) -> String {
    let secs = secs.max(0);
    format!("{}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

fn load_snapshot(store: &dyn StateStore) -> Option<TimeEntry> {
    let raw = match store.get(keys::RUNNING_TIMER) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read timer snapshot");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(entry) => Some(entry),
        Err(e) => {
            // A hint we cannot parse is worthless; drop it.
            tracing::warn!(error = %e, "Discarding corrupt timer snapshot");
            clear_snapshot(store);
            None
        }
    }
}

fn save_snapshot(store: &dyn StateStore, entry: &TimeEntry) {
    match serde_json::to_string(entry) {
        Ok(raw) => {
            if let Err(e) = store.put(keys::RUNNING_TIMER, &raw) {
                tracing::warn!(error = %e, "Failed to persist timer snapshot");
            }
        }
        Err(e) => tracing::warn!(error = %e, "Failed to serialize timer snapshot"),
    }
}

fn clear_snapshot(store: &dyn StateStore) {
    if let Err(e) = store.remove(keys::RUNNING_TIMER) {
        tracing::warn!(error = %e, "Failed to clear timer snapshot");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::Duration as ChronoDuration;
    use uuid::Uuid;

    fn entry_started_at(start: DateTime<Utc>) -> TimeEntry {
        TimeEntry {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            user_email: "worker@example.com".to_string(),
            project_id: Uuid::new_v4(),
            project_name: "P1".to_string(),
            task_id: None,
            task_name: None,
            organization_id: Uuid::new_v4(),
            start_time: start,
            end_time: None,
            is_running: true,
            is_billable: true,
            description: None,
            duration_seconds: None,
            tags: Vec::new(),
            created_at: start,
        }
    }

    #[test]
    fn test_elapsed_is_computed_from_start_timestamp() {
        let start = Utc::now() - ChronoDuration::seconds(125);
        assert_eq!(elapsed_since(start), 125);
    }

    #[test]
    fn test_elapsed_never_negative_for_future_start() {
        let start = Utc::now() + ChronoDuration::seconds(30);
        assert_eq!(elapsed_since(start), 0);
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(0), "0:00:00");
        assert_eq!(format_elapsed(125), "0:02:05");
        assert_eq!(format_elapsed(3661), "1:01:01");
    }

    #[test]
    fn test_snapshot_round_trip() {
        let store = MemoryStore::new();
        let entry = entry_started_at(Utc::now());

        save_snapshot(&store, &entry);
        assert_eq!(load_snapshot(&store), Some(entry));

        clear_snapshot(&store);
        assert_eq!(load_snapshot(&store), None);
    }

    #[test]
    fn test_corrupt_snapshot_is_discarded() {
        let store = MemoryStore::new();
        store.put(keys::RUNNING_TIMER, "{not json").unwrap();

        assert_eq!(load_snapshot(&store), None);
        // the bad value is gone, not retried forever
        assert_eq!(store.get(keys::RUNNING_TIMER).unwrap(), None);
    }
}
