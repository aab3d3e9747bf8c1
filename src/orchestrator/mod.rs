//! Fetch orchestrator: one guarded request at a time per slot.
//!
//! A `Fetcher<K, T>` sequences the request guard, the phase tracker and the
//! toast collector around each read:
//!
//! 1. `begin` the phase and `arm` the key, synchronously, at call time.
//! 2. Run the request (optionally bounded by `request_timeout`).
//! 3. On settlement, drop the result silently if the key is no longer armed;
//!    otherwise commit it as `Ready` or `Error` (errors are also toasted).
//!
//! Errors are never retried; a new request needs a new user intent.

mod fetcher;

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SyncError;

pub use fetcher::Fetcher;

/// Orchestrator settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FetchConfig {
    /// Upper bound for a single request, in milliseconds. `None` waits forever.
    pub request_timeout_ms: Option<u64>,
    /// Abort the task of a superseded `spawn_load` instead of letting it finish.
    pub abort_superseded: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: None,
            abort_superseded: true,
        }
    }
}

impl FetchConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}

/// How a single orchestrated request ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Settled {
    /// Current response committed as `Ready`.
    Committed,
    /// Current failure committed as `Error` and toasted.
    Failed(SyncError),
    /// A newer key was armed before this response arrived.
    Discarded,
    /// No request was issued (nothing selected, or dependency not met).
    Skipped,
}

impl Settled {
    pub fn is_committed(&self) -> bool {
        matches!(self, Settled::Committed)
    }
}
