//! Recorder metrics

/// Counters describing recorder activity
///
/// Updated inside the append critical section and the write path only;
/// calls made while the recorder is disabled are never counted. All
/// counters are monotonically increasing and saturate at `u64::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecorderMetrics {
    /// Events appended while enabled
    pub events_recorded: u64,

    /// Chunks allocated, head chunks included
    pub chunks_allocated: u64,

    /// Sessions begun with `start`
    pub sessions_started: u64,

    /// Trace files successfully written
    pub traces_written: u64,

    /// Events serialized to trace files
    pub events_written: u64,

    /// Bytes serialized to trace files
    pub bytes_written: u64,

    /// Events released without being written
    pub events_discarded: u64,
}

impl RecorderMetrics {
    /// Create new metrics with zero values
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an appended event
    #[inline]
    pub fn record_event(&mut self) {
        self.events_recorded = self.events_recorded.saturating_add(1);
    }

    /// Record a chunk allocation
    #[inline]
    pub fn record_chunk(&mut self) {
        self.chunks_allocated = self.chunks_allocated.saturating_add(1);
    }

    /// Record a session start
    pub fn record_session(&mut self) {
        self.sessions_started = self.sessions_started.saturating_add(1);
    }

    /// Record a completed trace write
    pub fn record_write(&mut self, events: usize, bytes: u64) {
        self.traces_written = self.traces_written.saturating_add(1);
        self.events_written = self
            .events_written
            .saturating_add(u64::try_from(events).unwrap_or(u64::MAX));
        self.bytes_written = self.bytes_written.saturating_add(bytes);
    }

    /// Record events released without being written
    pub fn record_discard(&mut self, events: usize) {
        self.events_discarded = self
            .events_discarded
            .saturating_add(u64::try_from(events).unwrap_or(u64::MAX));
    }

    /// Events recorded but not yet written or discarded
    pub fn events_pending(&self) -> u64 {
        self.events_recorded
            .saturating_sub(self.events_written)
            .saturating_sub(self.events_discarded)
    }
}

impl core::fmt::Display for RecorderMetrics {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "RecorderMetrics(recorded={}, written={}, discarded={}, chunks={}, sessions={}, traces={}, bytes={})",
            self.events_recorded,
            self.events_written,
            self.events_discarded,
            self.chunks_allocated,
            self.sessions_started,
            self.traces_written,
            self.bytes_written
        )
    }
}
