//! Nanosecond time sources

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Instant;

/// Source of event timestamps
///
/// Readings must be monotonic per thread. They are not required to be
/// synchronized across threads.
pub trait Clock: Send + Sync {
    /// Current reading in nanoseconds
    fn now_ns(&self) -> i64;
}

/// Monotonic clock counting nanoseconds from its creation
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Create a clock anchored at the current instant
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    #[inline]
    fn now_ns(&self) -> i64 {
        // Saturates after ~292 years of uptime.
        i64::try_from(self.origin.elapsed().as_nanos()).unwrap_or(i64::MAX)
    }
}

/// Deterministic clock that advances by a fixed step on every reading
///
/// Intended for tests and replayable traces.
#[derive(Debug)]
pub struct ManualClock {
    next: AtomicI64,
    step: i64,
}

impl ManualClock {
    /// Start at `start` and advance by `step` nanoseconds per reading
    pub const fn new(start: i64, step: i64) -> Self {
        Self {
            next: AtomicI64::new(start),
            step,
        }
    }

    /// Move the clock to `value` for the next reading
    pub fn set(&self, value: i64) {
        self.next.store(value, Ordering::Relaxed);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(0, 1)
    }
}

impl Clock for ManualClock {
    fn now_ns(&self) -> i64 {
        self.next.fetch_add(self.step, Ordering::Relaxed)
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    #[inline]
    fn now_ns(&self) -> i64 {
        (**self).now_ns()
    }
}
