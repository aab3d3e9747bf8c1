//! Load/error/ready phase of one fetch.

use serde::Serialize;

use crate::error::SyncError;

/// What the view should render for a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Nothing requested yet, or the displayed state was reset.
    Idle,
    Loading,
    Ready,
    Error,
}

/// Point-in-time view of a fetch: phase, last committed data, last error.
///
/// Data survives a later `Loading` or `Error` phase so a view may keep
/// showing it behind a spinner; it is only dropped by a reset.
#[derive(Debug, Clone)]
pub struct FetchState<T> {
    pub phase: Phase,
    pub data: Option<T>,
    pub error: Option<SyncError>,
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            data: None,
            error: None,
        }
    }
}

impl<T> FetchState<T> {
    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn is_ready(&self) -> bool {
        self.phase == Phase::Ready
    }

    pub fn is_error(&self) -> bool {
        self.phase == Phase::Error
    }
}

/// Drives a `FetchState` through its transitions.
///
/// `commit_success` and `commit_error` must only be called for a response
/// already confirmed current by the request guard.
#[derive(Debug)]
pub struct PhaseTracker<T> {
    state: FetchState<T>,
}

impl<T> Default for PhaseTracker<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PhaseTracker<T> {
    pub fn new() -> Self {
        Self {
            state: FetchState::default(),
        }
    }

    /// Enter `Loading`. Returns false if already loading.
    pub fn begin(&mut self) -> bool {
        if self.state.phase == Phase::Loading {
            return false;
        }
        self.state.phase = Phase::Loading;
        true
    }

    pub fn commit_success(&mut self, data: T) {
        self.state.phase = Phase::Ready;
        self.state.data = Some(data);
        self.state.error = None;
    }

    pub fn commit_error(&mut self, error: SyncError) {
        self.state.phase = Phase::Error;
        self.state.error = Some(error);
    }

    /// Leave a `Loading` phase that will never be committed.
    ///
    /// Returns to `previous`, or to `Ready`/`Idle` by whether data is shown
    /// when `previous` was itself a load nobody will settle.
    pub fn abandon(&mut self, previous: Phase) {
        if self.state.phase != Phase::Loading {
            return;
        }
        self.state.phase = match previous {
            Phase::Loading if self.state.data.is_some() => Phase::Ready,
            Phase::Loading => Phase::Idle,
            other => other,
        };
    }

    /// Back to `Idle` with nothing displayed.
    pub fn reset(&mut self) {
        self.state = FetchState::default();
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn state(&self) -> &FetchState<T> {
        &self.state
    }

    pub fn data_mut(&mut self) -> Option<&mut T> {
        self.state.data.as_mut()
    }

    /// Committed data, inserting `T::default()` when nothing was committed yet.
    pub fn data_or_default(&mut self) -> &mut T
    where
        T: Default,
    {
        self.state.data.get_or_insert_with(T::default)
    }
}
