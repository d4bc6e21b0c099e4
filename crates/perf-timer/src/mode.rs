//! Concurrency discipline of the recorder
//!
//! The mode is a type parameter of [`EventRecorder`](crate::EventRecorder),
//! so the choice is made at compile time:
//!
//! - [`SingleThreaded`]: no locking. The recorder state sits in a
//!   `RefCell`, which makes the recorder `!Sync`; the compiler refuses to
//!   share it between threads instead of leaving that to documentation.
//!   Every event carries thread id 0.
//! - [`MultiThreaded`]: one `parking_lot::Mutex` serializes the whole
//!   append critical section, chunk allocation included, across all
//!   threads. Every append contends on this single lock. Output order is
//!   the global order in which appends acquired the lock.
//!
//! [`DefaultMode`] is `SingleThreaded` unless the `multithreaded` feature
//! is enabled.

use core::cell::RefCell;

use parking_lot::Mutex;

use crate::platform::{OsThreadIdentity, SingleThreadIdentity, ThreadIdentity};

mod sealed {
    pub trait Sealed {}
}

/// Locking strategy and thread identity used by a recorder
///
/// Sealed: the two provided modes are the only implementations.
pub trait ThreadMode: sealed::Sealed + 'static {
    /// Container holding the recorder state
    type Guarded<T>;

    /// Identity stamped on events
    type Identity: ThreadIdentity + Default;

    /// Human-readable mode name for diagnostics
    const NAME: &'static str;

    /// Wrap the recorder state
    fn guard<T>(value: T) -> Self::Guarded<T>;

    /// Run `f` with exclusive access to the state
    ///
    /// The closure must not call back into the recorder.
    fn with<T, R>(guarded: &Self::Guarded<T>, f: impl FnOnce(&mut T) -> R) -> R;
}

/// Lock-free, thread-confined capture
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleThreaded;

impl sealed::Sealed for SingleThreaded {}

impl ThreadMode for SingleThreaded {
    type Guarded<T> = RefCell<T>;
    type Identity = SingleThreadIdentity;

    const NAME: &'static str = "single-threaded";

    #[inline]
    fn guard<T>(value: T) -> RefCell<T> {
        RefCell::new(value)
    }

    #[inline]
    fn with<T, R>(guarded: &RefCell<T>, f: impl FnOnce(&mut T) -> R) -> R {
        let mut state = guarded.borrow_mut();
        f(&mut *state)
    }
}

/// Capture from any thread under one shared lock
#[derive(Debug, Clone, Copy, Default)]
pub struct MultiThreaded;

impl sealed::Sealed for MultiThreaded {}

impl ThreadMode for MultiThreaded {
    type Guarded<T> = Mutex<T>;
    type Identity = OsThreadIdentity;

    const NAME: &'static str = "multithreaded";

    #[inline]
    fn guard<T>(value: T) -> Mutex<T> {
        Mutex::new(value)
    }

    #[inline]
    fn with<T, R>(guarded: &Mutex<T>, f: impl FnOnce(&mut T) -> R) -> R {
        let mut state = guarded.lock();
        f(&mut *state)
    }
}

/// Mode used when none is named explicitly
#[cfg(not(feature = "multithreaded"))]
pub type DefaultMode = SingleThreaded;

/// Mode used when none is named explicitly
#[cfg(feature = "multithreaded")]
pub type DefaultMode = MultiThreaded;
