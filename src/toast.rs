//! Process-wide error toast collector.
//!
//! Holds at most `limit` toasts (oldest evicted first); every toast
//! dismisses itself after `ttl`. Views either poll `visible()` or
//! `subscribe()` to a watch channel that receives the list after every change.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::AbortHandle;
use uuid::Uuid;

use crate::error::SyncError;

/// Toast collector settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ToastConfig {
    /// Maximum number of toasts visible at once.
    pub limit: usize,
    /// Auto-dismiss delay in milliseconds.
    pub ttl_ms: u64,
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            limit: 3,
            ttl_ms: 8_000,
        }
    }
}

impl ToastConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ToastId(Uuid);

impl ToastId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ToastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Toast {
    pub id: ToastId,
    pub message: String,
    pub raised_at: DateTime<Utc>,
}

#[derive(Default)]
struct ToastState {
    toasts: VecDeque<Toast>,
    timers: HashMap<ToastId, AbortHandle>,
}

struct ToastInner {
    config: ToastConfig,
    state: Mutex<ToastState>,
    updates: watch::Sender<Vec<Toast>>,
}

/// Shared handle to the toast list. Cloning shares the same list.
#[derive(Clone)]
pub struct Toaster {
    inner: Arc<ToastInner>,
}

impl Default for Toaster {
    fn default() -> Self {
        Self::new(ToastConfig::default())
    }
}

impl Toaster {
    pub fn new(config: ToastConfig) -> Self {
        let (updates, _) = watch::channel(Vec::new());
        Self {
            inner: Arc::new(ToastInner {
                config,
                state: Mutex::new(ToastState::default()),
                updates,
            }),
        }
    }

    pub fn config(&self) -> &ToastConfig {
        &self.inner.config
    }

    /// Show `error` to the user.
    pub fn catch_error(&self, error: &SyncError) -> ToastId {
        tracing::warn!(error = %error, "surfacing error toast");
        self.push(error.to_string())
    }

    /// Show an arbitrary error payload, rendered as JSON.
    pub fn catch_value<T: Serialize + ?Sized>(&self, value: &T) -> ToastId {
        let message = serde_json::to_string(value)
            .unwrap_or_else(|e| format!("unrenderable error payload: {}", e));
        tracing::warn!(%message, "surfacing error toast");
        self.push(message)
    }

    /// Remove a toast before its timer fires. Returns false if already gone.
    pub fn dismiss(&self, id: ToastId) -> bool {
        let removed = {
            let mut state = self.inner.state.lock();
            if let Some(timer) = state.timers.remove(&id) {
                timer.abort();
            }
            let before = state.toasts.len();
            state.toasts.retain(|toast| toast.id != id);
            state.toasts.len() != before
        };
        if removed {
            self.inner.publish();
        }
        removed
    }

    /// Visible toasts, oldest first.
    pub fn visible(&self) -> Vec<Toast> {
        self.inner.state.lock().toasts.iter().cloned().collect()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Toast>> {
        self.inner.updates.subscribe()
    }

    fn push(&self, message: String) -> ToastId {
        let id = ToastId::new();
        let toast = Toast {
            id,
            message,
            raised_at: Utc::now(),
        };

        {
            let mut state = self.inner.state.lock();
            state.toasts.push_back(toast);
            if let Some(timer) = self.spawn_dismiss_timer(id) {
                state.timers.insert(id, timer);
            }
            while state.toasts.len() > self.inner.config.limit {
                let Some(evicted) = state.toasts.pop_front() else {
                    break;
                };
                if let Some(timer) = state.timers.remove(&evicted.id) {
                    timer.abort();
                }
                tracing::debug!(toast = %evicted.id, "evicted oldest toast");
            }
        }

        self.inner.publish();
        id
    }

    fn spawn_dismiss_timer(&self, id: ToastId) -> Option<AbortHandle> {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(toast = %id, "no tokio runtime; toast will not auto-dismiss");
            return None;
        };
        let ttl = self.inner.config.ttl();
        let inner: Weak<ToastInner> = Arc::downgrade(&self.inner);
        let task = runtime.spawn(async move {
            tokio::time::sleep(ttl).await;
            if let Some(inner) = inner.upgrade() {
                inner.expire(id);
            }
        });
        Some(task.abort_handle())
    }
}

impl ToastInner {
    fn expire(&self, id: ToastId) {
        {
            let mut state = self.state.lock();
            state.timers.remove(&id);
            state.toasts.retain(|toast| toast.id != id);
        }
        tracing::debug!(toast = %id, "toast expired");
        self.publish();
    }

    fn publish(&self) {
        let snapshot: Vec<Toast> = self.state.lock().toasts.iter().cloned().collect();
        self.updates.send_replace(snapshot);
    }
}
