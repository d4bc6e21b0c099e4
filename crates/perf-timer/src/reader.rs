//! Decoding of perf_timer traces
//!
//! The reader checks the header, then yields records lazily. It never
//! panics on malformed input; the first decoding error ends iteration.

use core::fmt;
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::{PerfTimerError, Result};
use crate::events::EventKind;
use crate::format::MAGIC;

/// Event decoded from a trace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedEvent {
    /// Event kind
    pub kind: EventKind,
    /// Emitting thread
    pub thread_id: u64,
    /// Frame id
    pub frame_id: i32,
    /// Timestamp in nanoseconds
    pub timestamp_ns: i64,
    /// Raw name bytes
    pub name: Vec<u8>,
}

impl DecodedEvent {
    /// Name as text, replacing invalid UTF-8
    pub fn name_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.name)
    }
}

impl fmt::Display for DecodedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({}, thread={}, frame={}, ts={}ns)",
            self.kind.label(),
            self.name_lossy(),
            self.thread_id,
            self.frame_id,
            self.timestamp_ns
        )
    }
}

fn read_array<R: Read, const N: usize>(input: &mut R) -> Result<[u8; N]> {
    let mut buf = [0u8; N];
    input.read_exact(&mut buf).map_err(PerfTimerError::from_read)?;
    Ok(buf)
}

/// Streaming trace decoder
#[derive(Debug)]
pub struct TraceReader<R> {
    input: R,
    event_count: usize,
    remaining: usize,
    failed: bool,
}

impl<R: Read> TraceReader<R> {
    /// Read and validate the header
    ///
    /// # Errors
    ///
    /// Returns [`PerfTimerError::BadMagic`], [`PerfTimerError::NegativeEventCount`]
    /// or [`PerfTimerError::Truncated`] for a malformed header.
    pub fn new(mut input: R) -> Result<Self> {
        let magic = u32::from_le_bytes(read_array(&mut input)?);
        if magic != MAGIC {
            return Err(PerfTimerError::BadMagic(magic));
        }

        let count = i32::from_le_bytes(read_array(&mut input)?);
        let event_count =
            usize::try_from(count).map_err(|_negative| PerfTimerError::NegativeEventCount(count))?;

        Ok(Self {
            input,
            event_count,
            remaining: event_count,
            failed: false,
        })
    }

    /// Event count declared in the header
    pub fn event_count(&self) -> usize {
        self.event_count
    }

    /// Decode all remaining events
    ///
    /// # Errors
    ///
    /// Returns the first decoding error encountered.
    pub fn read_all(self) -> Result<Vec<DecodedEvent>> {
        self.collect()
    }

    fn read_event(&mut self) -> Result<DecodedEvent> {
        let [kind] = read_array::<_, 1>(&mut self.input)?;
        let kind = EventKind::try_from(kind)?;
        let thread_id = u64::from_le_bytes(read_array(&mut self.input)?);
        let frame_id = i32::from_le_bytes(read_array(&mut self.input)?);
        let timestamp_ns = i64::from_le_bytes(read_array(&mut self.input)?);

        let len = i16::from_le_bytes(read_array(&mut self.input)?);
        let len = usize::try_from(len).map_err(|_negative| PerfTimerError::NegativeNameLength(len))?;
        let mut name = vec![0u8; len];
        self.input
            .read_exact(&mut name)
            .map_err(PerfTimerError::from_read)?;

        Ok(DecodedEvent {
            kind,
            thread_id,
            frame_id,
            timestamp_ns,
            name,
        })
    }
}

impl<R: Read> Iterator for TraceReader<R> {
    type Item = Result<DecodedEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.remaining == 0 {
            return None;
        }

        let event = self.read_event();
        match event {
            Ok(_) => self.remaining = self.remaining.saturating_sub(1),
            Err(_) => self.failed = true,
        }
        Some(event)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.failed {
            (0, Some(0))
        } else {
            (0, Some(self.remaining))
        }
    }
}

/// Decode every event of the trace at `path`
///
/// # Errors
///
/// Returns an I/O error if the file cannot be opened, or the first
/// decoding error.
pub fn read_trace(path: impl AsRef<Path>) -> Result<Vec<DecodedEvent>> {
    let file = File::open(path)?;
    TraceReader::new(BufReader::new(file))?.read_all()
}
