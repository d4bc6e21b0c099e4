//! Scoped timers and note emission

use crate::events::{EventKind, EventName};
use crate::mode::ThreadMode;
use crate::recorder::EventRecorder;

/// Guard marking a timed scope
///
/// Creating the guard records an enter event; dropping it records the
/// matching exit event with a fresh timestamp and the same name and frame.
/// The exit is recorded on every path out of the scope, early returns and
/// unwinding panics included.
///
/// Enter and exit carry no correlation id. Consumers pair them by nesting
/// order per thread.
#[must_use = "the scope closes as soon as the guard is dropped"]
pub struct ScopedTimer<'r, 'n, M: ThreadMode> {
    recorder: &'r EventRecorder<'n, M>,
    name: &'n str,
    frame_id: i32,
}

impl<'r, 'n, M: ThreadMode> ScopedTimer<'r, 'n, M> {
    /// Record an enter event and return the guard
    #[inline]
    pub fn new(recorder: &'r EventRecorder<'n, M>, name: &'n str, frame_id: i32) -> Self {
        recorder.record(EventKind::EnterContext, name, frame_id);
        Self {
            recorder,
            name,
            frame_id,
        }
    }

    /// Scope name
    pub fn name(&self) -> &'n str {
        self.name
    }

    /// Frame the scope belongs to
    pub fn frame_id(&self) -> i32 {
        self.frame_id
    }
}

impl<M: ThreadMode> Drop for ScopedTimer<'_, '_, M> {
    #[inline]
    fn drop(&mut self) {
        self.recorder
            .record(EventKind::ExitContext, self.name, self.frame_id);
    }
}

impl<M: ThreadMode> core::fmt::Debug for ScopedTimer<'_, '_, M> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ScopedTimer")
            .field("name", &self.name)
            .field("frame_id", &self.frame_id)
            .finish_non_exhaustive()
    }
}

/// Record a note event on `recorder`
#[inline]
pub fn note<'n, M: ThreadMode>(
    recorder: &EventRecorder<'n, M>,
    name: impl Into<EventName<'n>>,
    frame_id: i32,
) {
    recorder.note(name, frame_id);
}
