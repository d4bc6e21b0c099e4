//! Recorder error types

use core::fmt;
use std::io;
use std::path::PathBuf;

/// Errors produced while capturing, serializing or decoding traces
#[derive(Debug, thiserror::Error)]
pub enum PerfTimerError {
    /// The trace destination could not be opened for writing
    #[error("Could not open perf_timer output file {path:?} for writing: {source}")]
    DestinationUnavailable {
        /// Destination that failed to open
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// An owned event name could not be allocated
    #[error("Out of memory cloning a {len}-byte event name")]
    NameAllocation {
        /// Requested payload length in bytes
        len: usize,
    },

    /// The event count does not fit the 32-bit count field of the format
    #[error("Event count {0} exceeds the trace format limit")]
    EventCountOverflow(usize),

    /// Invalid recorder configuration
    #[error("Invalid recorder configuration: {0}")]
    InvalidConfiguration(String),

    /// I/O failure part-way through writing or reading a trace
    #[error("Trace I/O error: {0}")]
    Io(#[from] io::Error),

    /// Trace did not start with the expected magic value
    #[error("Bad trace magic 0x{0:X}")]
    BadMagic(u32),

    /// Unknown event kind byte in a trace
    #[error("Unknown event kind {0}")]
    UnknownEventKind(u8),

    /// Negative event count in a trace header
    #[error("Negative event count {0}")]
    NegativeEventCount(i32),

    /// Negative name length in a trace
    #[error("Negative name length {0}")]
    NegativeNameLength(i16),

    /// Trace ended before the declared number of events was read
    #[error("Trace truncated")]
    Truncated,
}

impl PerfTimerError {
    /// Check if the recorder can keep going after this error
    ///
    /// A failed destination leaves the buffered events in place, so the
    /// caller may retry once the destination is reachable.
    pub fn is_recoverable(&self) -> bool {
        match self {
            PerfTimerError::DestinationUnavailable { .. } => true,
            PerfTimerError::NameAllocation { .. } => false,
            PerfTimerError::EventCountOverflow(_) => false,
            PerfTimerError::InvalidConfiguration(_) => false,
            PerfTimerError::Io(_) => false,
            PerfTimerError::BadMagic(_)
            | PerfTimerError::UnknownEventKind(_)
            | PerfTimerError::NegativeEventCount(_)
            | PerfTimerError::NegativeNameLength(_)
            | PerfTimerError::Truncated => false,
        }
    }

    /// Check if this error came from decoding a malformed trace
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            PerfTimerError::BadMagic(_)
                | PerfTimerError::UnknownEventKind(_)
                | PerfTimerError::NegativeEventCount(_)
                | PerfTimerError::NegativeNameLength(_)
                | PerfTimerError::Truncated
        )
    }

    /// Create a destination error for `path`
    pub fn destination(path: impl Into<PathBuf>, source: io::Error) -> Self {
        PerfTimerError::DestinationUnavailable {
            path: path.into(),
            source,
        }
    }

    /// Create a configuration error with context
    pub fn invalid_config(context: impl fmt::Display) -> Self {
        PerfTimerError::InvalidConfiguration(context.to_string())
    }

    /// Map an I/O error raised while decoding, turning early EOF into [`PerfTimerError::Truncated`]
    pub(crate) fn from_read(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            PerfTimerError::Truncated
        } else {
            PerfTimerError::Io(err)
        }
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, PerfTimerError>;
