//! Captured event definitions

use core::fmt;

use crate::error::{PerfTimerError, Result};

/// Kind of a captured event
///
/// The discriminant is the byte written to the trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EventKind {
    /// A scope was entered
    EnterContext = 0,
    /// A scope was left
    ExitContext = 1,
    /// Unbracketed annotation
    Note = 2,
}

impl EventKind {
    /// Wire byte for this kind
    #[inline]
    pub const fn as_byte(self) -> u8 {
        self as u8
    }

    /// Parse a wire byte
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(EventKind::EnterContext),
            1 => Some(EventKind::ExitContext),
            2 => Some(EventKind::Note),
            _ => None,
        }
    }

    /// Short label used in `Display` output
    pub const fn label(self) -> &'static str {
        match self {
            EventKind::EnterContext => "Enter",
            EventKind::ExitContext => "Exit",
            EventKind::Note => "Note",
        }
    }
}

impl TryFrom<u8> for EventKind {
    type Error = PerfTimerError;

    fn try_from(byte: u8) -> Result<Self> {
        EventKind::from_byte(byte).ok_or(PerfTimerError::UnknownEventKind(byte))
    }
}

/// Name attached to an event
///
/// `Borrowed` names point into caller storage that outlives the recorder
/// (usually string literals) and are written without copying. `Owned`
/// names belong to the recorder and are dropped once written, or when
/// their chunk is discarded unwritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventName<'n> {
    /// Caller-owned label
    Borrowed(&'n str),
    /// Recorder-owned copy
    Owned(Box<str>),
}

impl EventName<'static> {
    /// Copy `name` into recorder-owned storage
    ///
    /// Allocation failure is reported instead of producing a partial name.
    ///
    /// # Errors
    ///
    /// Returns [`PerfTimerError::NameAllocation`] if the copy cannot be allocated.
    pub fn clone_str(name: &str) -> Result<Self> {
        let mut owned = String::new();
        owned
            .try_reserve_exact(name.len())
            .map_err(|_alloc| PerfTimerError::NameAllocation { len: name.len() })?;
        owned.push_str(name);
        Ok(EventName::Owned(owned.into_boxed_str()))
    }
}

impl EventName<'_> {
    /// Label text
    #[inline]
    pub fn as_str(&self) -> &str {
        match self {
            EventName::Borrowed(name) => name,
            EventName::Owned(name) => name,
        }
    }

    /// Label bytes as written to the trace, before length clamping
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        self.as_str().as_bytes()
    }

    /// Payload length in bytes
    #[inline]
    pub fn len(&self) -> usize {
        self.as_str().len()
    }

    /// Returns true for an empty label
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }

    /// Returns true if the recorder owns the storage
    #[inline]
    pub const fn is_owned(&self) -> bool {
        matches!(self, EventName::Owned(_))
    }
}

impl<'n> From<&'n str> for EventName<'n> {
    fn from(name: &'n str) -> Self {
        EventName::Borrowed(name)
    }
}

impl From<String> for EventName<'_> {
    fn from(name: String) -> Self {
        EventName::Owned(name.into_boxed_str())
    }
}

impl From<Box<str>> for EventName<'_> {
    fn from(name: Box<str>) -> Self {
        EventName::Owned(name)
    }
}

impl fmt::Display for EventName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One captured occurrence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event<'n> {
    /// Event kind
    pub kind: EventKind,
    /// Emitting thread, 0 in single-threaded mode
    pub thread_id: u64,
    /// Caller-supplied grouping tag, not validated
    pub frame_id: i32,
    /// Clock reading in nanoseconds
    pub timestamp_ns: i64,
    /// Event label
    pub name: EventName<'n>,
}

impl<'n> Event<'n> {
    /// Create an event
    pub fn new(
        kind: EventKind,
        thread_id: u64,
        frame_id: i32,
        timestamp_ns: i64,
        name: impl Into<EventName<'n>>,
    ) -> Self {
        Self {
            kind,
            thread_id,
            frame_id,
            timestamp_ns,
            name: name.into(),
        }
    }

    /// Returns true for scope enter/exit events
    #[inline]
    pub const fn is_context(&self) -> bool {
        matches!(self.kind, EventKind::EnterContext | EventKind::ExitContext)
    }
}

impl fmt::Display for Event<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({}, thread={}, frame={}, ts={}ns)",
            self.kind.label(),
            self.name,
            self.thread_id,
            self.frame_id,
            self.timestamp_ns
        )
    }
}
