//! Platform shims: time source and thread identity

mod clock;
mod thread;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use thread::{OsThreadIdentity, SINGLE_THREAD_ID, SingleThreadIdentity, ThreadIdentity};
