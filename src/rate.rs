// Sliding-window request-rate tracker.
//
// Keeps the monotonic timestamps of the most recent requests in a bounded
// deque and reports requests/second over the trailing minute. Memory is
// bounded by the capacity cap, not by the window: under sustained load above
// capacity/window (16.6 req/s at the defaults) the oldest timestamps are
// evicted while still inside the window and the reported rate undercounts
// true volume. That trade-off is deliberate and kept from the source design.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::debug;

/// Trailing interval over which the rate is computed.
pub const WINDOW: Duration = Duration::from_secs(60);

/// Maximum stored timestamps, independent of the window.
pub const CAPACITY: usize = 1000;

/// Concurrency-safe bounded log of request timestamps.
///
/// `record` and `rate` serialize on one mutex; the critical sections only
/// touch the deque, so holding a classifier call never blocks a rate read.
pub struct RateTracker {
    window: Duration,
    capacity: usize,
    timestamps: Mutex<VecDeque<Instant>>,
}

impl RateTracker {
    /// Tracker with the production window (60 s) and capacity (1000).
    pub fn new() -> Self {
        Self::with_limits(WINDOW, CAPACITY)
    }

    /// Tracker with explicit limits. Tests shrink these to keep fast.
    pub fn with_limits(window: Duration, capacity: usize) -> Self {
        Self {
            window,
            capacity,
            timestamps: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    /// Append one request timestamp, evicting the oldest entry when the
    /// capacity cap is reached. Capacity eviction is independent of the
    /// time window: an entry still inside the window can be dropped.
    pub fn record(&self, now: Instant) {
        let mut log = self.lock();
        if log.len() == self.capacity {
            log.pop_front();
        }
        log.push_back(now);
    }

    /// Requests/second over the trailing window, as seen at `now`.
    ///
    /// Trims entries strictly older than `now - window` from the front.
    /// An entry exactly at the cutoff is kept ("last N seconds" inclusive).
    pub fn rate(&self, now: Instant) -> f64 {
        let cutoff = now.checked_sub(self.window);

        let mut log = self.lock();
        if let Some(cutoff) = cutoff {
            while log.front().is_some_and(|&t| t < cutoff) {
                log.pop_front();
            }
        }

        if log.is_empty() {
            return 0.0;
        }

        let rate = log.len() as f64 / self.window.as_secs_f64();
        debug!(requests_per_second = rate, "current request rate");
        rate
    }

    /// Number of timestamps currently held (post-eviction, pre-trim).
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<Instant>> {
        // A poisoned lock means a panic while pushing/popping a VecDeque of
        // Copy values; the structure is still coherent, so keep serving.
        self.timestamps
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for RateTracker {
    fn default() -> Self {
        Self::new()
    }
}
