//! Identity token guard: "last armed key wins".
//!
//! Every fetch orchestrator owns one guard. The key is armed synchronously
//! right before a request is dispatched and compared once when the request
//! settles. A response whose key no longer equals the armed key is stale.

use std::fmt;

use parking_lot::Mutex;

/// Sequence number of an `arm` call. Only used for logging and bookkeeping;
/// currency is decided by key equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

struct Armed<K> {
    key: Option<K>,
    generation: u64,
}

/// Holds the most recently requested key.
///
/// `None` is a real key meaning "nothing selected": arming it makes every
/// in-flight `Some(_)` request stale.
pub struct RequestGuard<K> {
    armed: Mutex<Armed<K>>,
}

impl<K> Default for RequestGuard<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> RequestGuard<K> {
    pub fn new() -> Self {
        Self {
            armed: Mutex::new(Armed {
                key: None,
                generation: 0,
            }),
        }
    }

    /// Record `key` as the current request tag.
    pub fn arm(&self, key: Option<K>) -> Generation {
        let mut armed = self.armed.lock();
        armed.generation += 1;
        armed.key = key;
        Generation(armed.generation)
    }

    /// Generation of the most recent `arm`.
    pub fn generation(&self) -> Generation {
        Generation(self.armed.lock().generation)
    }
}

impl<K: PartialEq> RequestGuard<K> {
    /// True iff `key` equals the most recently armed key.
    pub fn is_current(&self, key: &Option<K>) -> bool {
        self.armed.lock().key == *key
    }
}

impl<K: Clone> RequestGuard<K> {
    /// The key currently armed.
    pub fn current(&self) -> Option<K> {
        self.armed.lock().key.clone()
    }
}
