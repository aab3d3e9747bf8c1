use std::fmt;
use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task::{AbortHandle, JoinHandle};

use super::{FetchConfig, Settled};
use crate::error::SyncError;
use crate::guard::{Generation, RequestGuard};
use crate::phase::{FetchState, Phase, PhaseTracker};
use crate::toast::Toaster;

struct FetcherInner<K, T> {
    label: &'static str,
    guard: RequestGuard<K>,
    tracker: Mutex<PhaseTracker<T>>,
    toasts: Toaster,
    config: FetchConfig,
    in_flight: Mutex<Option<AbortHandle>>,
}

/// Stale-guarded fetch slot for data of type `T`, keyed by `K`.
///
/// Clones share the same slot. The tracker lock is taken before the guard in
/// both `start` and `settle`, so checking currency and committing is atomic
/// with respect to arming a new key.
pub struct Fetcher<K, T> {
    inner: Arc<FetcherInner<K, T>>,
}

impl<K, T> Clone for Fetcher<K, T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, T> Fetcher<K, T>
where
    K: Clone + PartialEq + fmt::Debug + Send + Sync + 'static,
    T: Clone + Send + 'static,
{
    pub fn new(label: &'static str, toasts: Toaster, config: FetchConfig) -> Self {
        Self {
            inner: Arc::new(FetcherInner {
                label,
                guard: RequestGuard::new(),
                tracker: Mutex::new(PhaseTracker::new()),
                toasts,
                config,
                in_flight: Mutex::new(None),
            }),
        }
    }

    /// Begin loading `key` now and return the future that awaits `request`.
    ///
    /// The phase flips to `Loading` and the key is armed before this returns,
    /// so a later call supersedes this one even if neither future has been
    /// polled yet. Dropping the future before it settles undoes the
    /// `Loading` phase if no later call has armed since.
    pub fn load<Fut>(&self, key: K, request: Fut) -> impl Future<Output = Settled> + Send + 'static
    where
        Fut: Future<Output = Result<T, SyncError>> + Send + 'static,
    {
        let key = Some(key);
        let (generation, previous) = self.inner.start(key.clone());
        let mut pending = Pending {
            inner: Arc::clone(&self.inner),
            generation,
            previous,
            completed: false,
        };
        async move {
            let outcome = pending.inner.bounded(request).await;
            pending.completed = true;
            pending.inner.settle(&key, generation, outcome)
        }
    }

    /// Load `key` if there is one; otherwise clear the slot.
    pub fn select<F, Fut>(
        &self,
        key: Option<K>,
        request: F,
    ) -> impl Future<Output = Settled> + Send + 'static
    where
        F: FnOnce(K) -> Fut,
        Fut: Future<Output = Result<T, SyncError>> + Send + 'static,
    {
        let pending = match key {
            Some(key) => Some(self.load(key.clone(), request(key))),
            None => {
                self.clear();
                None
            }
        };
        async move {
            match pending {
                Some(pending) => pending.await,
                None => Settled::Skipped,
            }
        }
    }

    /// Load `key` only while `ready` holds.
    ///
    /// When the dependency is false the displayed state is reset at once and
    /// any in-flight response becomes stale; `request` is not called.
    pub fn load_when<F, Fut>(
        &self,
        key: K,
        ready: bool,
        request: F,
    ) -> impl Future<Output = Settled> + Send + 'static
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, SyncError>> + Send + 'static,
    {
        let pending = if ready {
            Some(self.load(key, request()))
        } else {
            tracing::debug!(fetch = self.inner.label, ?key, "dependency not met; clearing");
            self.clear();
            None
        };
        async move {
            match pending {
                Some(pending) => pending.await,
                None => Settled::Skipped,
            }
        }
    }

    /// Like `load`, but runs on a tokio task.
    ///
    /// With `abort_superseded` set, the task of the previous `spawn_load` is
    /// aborted; its handle then resolves to a cancelled `JoinError`.
    /// Must be called within a tokio runtime.
    pub fn spawn_load<Fut>(&self, key: K, request: Fut) -> JoinHandle<Settled>
    where
        Fut: Future<Output = Result<T, SyncError>> + Send + 'static,
    {
        let handle = tokio::spawn(self.load(key, request));
        let previous = self.inner.in_flight.lock().replace(handle.abort_handle());
        if self.inner.config.abort_superseded {
            if let Some(previous) = previous {
                previous.abort();
            }
        }
        handle
    }

    /// Forget the selection: arm "nothing", reset to `Idle`.
    pub fn clear(&self) {
        {
            let mut tracker = self.inner.tracker.lock();
            tracker.reset();
            self.inner.guard.arm(None);
        }
        if self.inner.config.abort_superseded {
            if let Some(previous) = self.inner.in_flight.lock().take() {
                previous.abort();
            }
        }
    }

    /// Read the committed data without cloning it.
    pub fn with_data<R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        self.inner.tracker.lock().state().data.as_ref().map(f)
    }

    /// Apply `f` to the committed data, if any.
    pub fn update_data<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        self.inner.tracker.lock().data_mut().map(f)
    }

    /// Apply `f` to the committed data, starting from `T::default()` if none.
    pub fn update_data_or_default<R>(&self, f: impl FnOnce(&mut T) -> R) -> R
    where
        T: Default,
    {
        f(self.inner.tracker.lock().data_or_default())
    }

    pub fn state(&self) -> FetchState<T> {
        self.inner.tracker.lock().state().clone()
    }

    pub fn phase(&self) -> Phase {
        self.inner.tracker.lock().phase()
    }

    pub fn data(&self) -> Option<T> {
        self.inner.tracker.lock().state().data.clone()
    }

    pub fn error(&self) -> Option<SyncError> {
        self.inner.tracker.lock().state().error.clone()
    }

    /// The key of the most recent request, `None` after `clear`.
    pub fn current_key(&self) -> Option<K> {
        self.inner.guard.current()
    }

    pub fn label(&self) -> &'static str {
        self.inner.label
    }
}

impl<K, T> FetcherInner<K, T>
where
    K: PartialEq + fmt::Debug,
{
    fn start(&self, key: Option<K>) -> (Generation, Phase) {
        let mut tracker = self.tracker.lock();
        let previous = tracker.phase();
        tracker.begin();
        tracing::debug!(fetch = self.label, ?key, "arming request");
        (self.guard.arm(key), previous)
    }

    async fn bounded<Fut>(&self, request: Fut) -> Result<T, SyncError>
    where
        Fut: Future<Output = Result<T, SyncError>>,
    {
        match self.config.request_timeout() {
            Some(limit) => tokio::time::timeout(limit, request)
                .await
                .unwrap_or_else(|_| Err(SyncError::Timeout(limit))),
            None => request.await,
        }
    }

    fn settle(
        &self,
        key: &Option<K>,
        generation: Generation,
        outcome: Result<T, SyncError>,
    ) -> Settled {
        let mut tracker = self.tracker.lock();
        if !self.guard.is_current(key) {
            tracing::debug!(fetch = self.label, ?key, %generation, "discarding stale response");
            return Settled::Discarded;
        }

        match outcome {
            Ok(data) => {
                tracker.commit_success(data);
                tracing::debug!(fetch = self.label, ?key, %generation, "committed");
                Settled::Committed
            }
            Err(error) => {
                tracker.commit_error(error.clone());
                drop(tracker);
                self.toasts.catch_error(&error);
                Settled::Failed(error)
            }
        }
    }
}

/// Undoes `start` when a `load` future is dropped before it settles.
struct Pending<K, T> {
    inner: Arc<FetcherInner<K, T>>,
    generation: Generation,
    previous: Phase,
    completed: bool,
}

impl<K, T> Drop for Pending<K, T> {
    fn drop(&mut self) {
        if self.completed {
            return;
        }
        let mut tracker = self.inner.tracker.lock();
        // A later arm owns the phase now.
        if self.inner.guard.generation() != self.generation {
            return;
        }
        tracker.abandon(self.previous);
        tracing::debug!(fetch = self.inner.label, generation = %self.generation, "load dropped before settling");
    }
}
