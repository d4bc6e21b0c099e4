//! Thread identity

use std::sync::atomic::{AtomicU64, Ordering};

/// Thread id recorded by single-threaded recorders
pub const SINGLE_THREAD_ID: u64 = 0;

/// Source of the `thread_id` stamped on each event
pub trait ThreadIdentity: Send + Sync {
    /// Identifier of the calling thread
    fn current(&self) -> u64;
}

/// Stable per-thread identifier
///
/// Ids are handed out on first use, starting at 1, and stay fixed for the
/// lifetime of the thread. They are never reused within a process.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsThreadIdentity;

static NEXT_THREAD_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static THREAD_ID: u64 = NEXT_THREAD_ID.fetch_add(1, Ordering::Relaxed);
}

impl ThreadIdentity for OsThreadIdentity {
    #[inline]
    fn current(&self) -> u64 {
        THREAD_ID.with(|id| *id)
    }
}

/// Constant identity for single-threaded capture
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleThreadIdentity;

impl ThreadIdentity for SingleThreadIdentity {
    #[inline]
    fn current(&self) -> u64 {
        SINGLE_THREAD_ID
    }
}
