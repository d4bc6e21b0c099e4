//! Event recorder coordinating capture and serialization

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{error, info, trace, warn};

use crate::buffer::BufferChain;
use crate::config::RecorderConfig;
use crate::error::{PerfTimerError, Result};
use crate::events::{Event, EventKind, EventName};
use crate::format::{write_event, write_header};
use crate::metrics::RecorderMetrics;
use crate::mode::{DefaultMode, ThreadMode};
use crate::platform::{Clock, MonotonicClock, ThreadIdentity};
use crate::scope::ScopedTimer;

/// Outcome of a successful trace write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteSummary {
    /// File the trace was written to
    pub path: PathBuf,
    /// Number of events serialized
    pub events: usize,
    /// Number of chunks the events occupied, empty tail included
    pub chunks: usize,
    /// Total bytes written, header included
    pub bytes: u64,
}

/// Mutable recorder state, guarded according to the thread mode
#[derive(Debug, Default)]
struct RecorderState<'n> {
    destination: Option<PathBuf>,
    chain: Option<BufferChain<'n>>,
    metrics: RecorderMetrics,
}

impl<'n> RecorderState<'n> {
    fn pending(&self) -> usize {
        self.chain.as_ref().map_or(0, BufferChain::len)
    }

    fn fresh_chain(&mut self, capacity: usize) -> BufferChain<'n> {
        self.metrics.record_chunk();
        BufferChain::new(capacity)
    }
}

/// Opened trace destination with the chain detached for it
struct PendingWrite<'n> {
    path: PathBuf,
    file: File,
    chain: BufferChain<'n>,
}

/// Buffers timestamped events and serializes them to a trace file
///
/// The recorder is an explicit instance: create one, [`start`](Self::start)
/// a session, instrument code with [`ScopedTimer`]s and notes, then
/// [`end`](Self::end) the session to write the trace. Dropping the recorder
/// writes any events still pending.
///
/// # Example
///
/// ```rust,ignore
/// use perf_timer::prelude::*;
///
/// let recorder: EventRecorder = EventRecorder::new();
/// recorder.start("frame.perf");
///
/// for frame in 0..3 {
///     let _update = recorder.scope("update", frame);
///     recorder.note("tick", frame);
/// }
///
/// let summary = recorder.end()?;
/// ```
///
/// # Lifetimes
///
/// Borrowed names (`&'n str`) are stored without copying and must outlive
/// the recorder. Owned names (`String`, [`EventName::clone_str`]) are freed
/// when their event is written or discarded.
///
/// # Thread Safety
///
/// With [`SingleThreaded`](crate::SingleThreaded) the recorder is `Send`
/// but not `Sync`. With [`MultiThreaded`](crate::MultiThreaded) it is
/// `Send + Sync` and every append contends on one lock.
pub struct EventRecorder<'n, M: ThreadMode = DefaultMode> {
    enabled: AtomicBool,
    state: M::Guarded<RecorderState<'n>>,
    writer: M::Guarded<()>,
    clock: Arc<dyn Clock>,
    identity: M::Identity,
    config: RecorderConfig,
}

impl<'n, M: ThreadMode> EventRecorder<'n, M> {
    /// Create an idle recorder with the default configuration and the
    /// monotonic clock
    pub fn new() -> Self {
        Self::build(RecorderConfig::default(), Arc::new(MonotonicClock::new()))
    }

    /// Create an idle recorder with `config`
    ///
    /// # Errors
    ///
    /// Returns [`PerfTimerError::InvalidConfiguration`] if `config` does not
    /// validate.
    pub fn with_config(config: RecorderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config, Arc::new(MonotonicClock::new())))
    }

    /// Create an idle recorder with `config` reading timestamps from `clock`
    ///
    /// # Errors
    ///
    /// Returns [`PerfTimerError::InvalidConfiguration`] if `config` does not
    /// validate.
    pub fn with_clock(config: RecorderConfig, clock: impl Clock + 'static) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config, Arc::new(clock)))
    }

    fn build(config: RecorderConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            enabled: AtomicBool::new(false),
            state: M::guard(RecorderState::default()),
            writer: M::guard(()),
            clock,
            identity: M::Identity::default(),
            config,
        }
    }

    /// Begin a session writing to `destination`
    ///
    /// Installs an empty chain and enables recording. Events left over from
    /// a previous session that was never ended are discarded.
    pub fn start(&self, destination: impl Into<PathBuf>) {
        let destination = destination.into();
        let capacity = self.config.buffer_capacity;

        let discarded = M::with(&self.state, |state| {
            let discarded = state.pending();
            if discarded > 0 {
                state.metrics.record_discard(discarded);
            }

            let chain = state.fresh_chain(capacity);
            state.chain = Some(chain);
            state.destination = Some(destination.clone());
            state.metrics.record_session();
            discarded
        });

        if discarded > 0 {
            warn!(
                events = discarded,
                "Discarded unwritten perf_timer events from previous session"
            );
        }

        self.enabled.store(true, Ordering::Relaxed);
        info!(
            path = %destination.display(),
            mode = M::NAME,
            buffer_capacity = capacity,
            "perf_timer session started"
        );
    }

    /// End the session: stop recording, write the trace and release the
    /// buffers
    ///
    /// The buffers are released and the event count is zero when this
    /// returns, whether or not the write succeeded.
    ///
    /// # Errors
    ///
    /// Returns the error of the final [`write`](Self::write). Events that
    /// could not be written are discarded.
    pub fn end(&self) -> Result<Option<WriteSummary>> {
        self.enabled.store(false, Ordering::Relaxed);
        let result = self.write();

        let discarded = M::with(&self.state, |state| {
            let discarded = state.pending();
            if discarded > 0 {
                state.metrics.record_discard(discarded);
            }
            state.chain = None;
            discarded
        });

        if discarded > 0 {
            warn!(events = discarded, "Discarded unwritten perf_timer events");
        }
        info!(mode = M::NAME, "perf_timer session ended");

        result
    }

    /// Write all pending events to the session destination
    ///
    /// Does nothing and returns `Ok(None)` when no event is pending; the
    /// destination is not created or touched. Otherwise the pending events
    /// are written and released. If recording is still enabled, capture
    /// continues into a fresh chain.
    ///
    /// # Overwrites earlier writes
    ///
    /// Every write truncates the destination and replaces its contents with
    /// the events pending at that moment. Calling `write` mid-session and
    /// then [`end`](Self::end) leaves only the events recorded after the
    /// mid-session write in the file. To keep both, [`start`](Self::start)
    /// a new session with another destination after the mid-session write.
    ///
    /// Concurrent writes are serialized; appends keep going while a write
    /// encodes.
    ///
    /// # Errors
    ///
    /// - [`PerfTimerError::DestinationUnavailable`] if the destination
    ///   cannot be opened. Pending events are kept.
    /// - [`PerfTimerError::EventCountOverflow`] if the pending count does
    ///   not fit the format. Pending events are kept.
    /// - [`PerfTimerError::Io`] if writing fails part-way. The events are
    ///   lost and the file is left as written.
    pub fn write(&self) -> Result<Option<WriteSummary>> {
        let outcome = M::with(&self.writer, |_| self.write_pending());

        match &outcome {
            Ok(Some(summary)) => info!(
                path = %summary.path.display(),
                events = summary.events,
                chunks = summary.chunks,
                bytes = summary.bytes,
                "perf_timer trace written"
            ),
            Ok(None) => {}
            Err(PerfTimerError::DestinationUnavailable { path, source }) => error!(
                path = %path.display(),
                error = %source,
                "Could not open perf_timer output file for writing"
            ),
            Err(e) => error!(error = %e, "Failed to write perf_timer trace"),
        }

        outcome
    }

    /// Detach and serialize the pending chain; runs under the writer gate
    fn write_pending(&self) -> Result<Option<WriteSummary>> {
        let Some(pending) = self.take_pending()? else {
            return Ok(None);
        };

        let events = pending.chain.len();
        let outcome = Self::encode(pending);

        M::with(&self.state, |state| match &outcome {
            Ok(summary) => state.metrics.record_write(summary.events, summary.bytes),
            Err(_) => state.metrics.record_discard(events),
        });

        outcome.map(Some)
    }

    /// Open the destination, then detach the pending chain
    ///
    /// The file is opened between two short state guards, so appenders
    /// never wait on the filesystem.
    fn take_pending(&self) -> Result<Option<PendingWrite<'n>>> {
        let target = M::with(&self.state, |state| {
            let count = state.pending();
            if count == 0 {
                return Ok(None);
            }
            if i32::try_from(count).is_err() {
                return Err(PerfTimerError::EventCountOverflow(count));
            }
            Ok(state.destination.clone())
        })?;
        let Some(path) = target else {
            return Ok(None);
        };

        let file = match File::create(&path) {
            Ok(file) => file,
            Err(source) => return Err(PerfTimerError::destination(path, source)),
        };

        let capacity = self.config.buffer_capacity;
        let chain = M::with(&self.state, |state| {
            let successor = if self.enabled.load(Ordering::Relaxed) {
                Some(state.fresh_chain(capacity))
            } else {
                None
            };
            core::mem::replace(&mut state.chain, successor)
        });

        Ok(chain.map(|chain| PendingWrite { path, file, chain }))
    }

    /// Serialize a detached chain, releasing each event once written
    fn encode(pending: PendingWrite<'n>) -> Result<WriteSummary> {
        let PendingWrite { path, file, chain } = pending;
        let events = chain.len();
        let chunks = chain.chunk_count();

        let mut out = BufWriter::new(file);
        let mut bytes = write_header(&mut out, events)?;
        for chunk in chain.into_chunks() {
            for event in chunk.into_events() {
                bytes = bytes.saturating_add(write_event(&mut out, &event)?);
            }
        }
        out.flush()?;

        Ok(WriteSummary {
            path,
            events,
            chunks,
            bytes: u64::try_from(bytes).unwrap_or(u64::MAX),
        })
    }

    /// Append a prepared event
    ///
    /// A no-op while recording is disabled: one relaxed flag load and the
    /// event is dropped.
    #[inline]
    pub fn append(&self, event: Event<'n>) {
        if !self.enabled.load(Ordering::Relaxed) {
            return;
        }
        self.push(event);
    }

    /// Timestamp and append an event for the calling thread
    ///
    /// The clock is not read while recording is disabled.
    #[inline]
    pub fn record(&self, kind: EventKind, name: impl Into<EventName<'n>>, frame_id: i32) {
        if !self.enabled.load(Ordering::Relaxed) {
            return;
        }
        let event = Event::new(
            kind,
            self.identity.current(),
            frame_id,
            self.clock.now_ns(),
            name,
        );
        self.push(event);
    }

    fn push(&self, event: Event<'n>) {
        let allocated = M::with(&self.state, |state| {
            // Chain is gone if the session ended after the flag was read.
            let chain = state.chain.as_mut()?;
            let allocated = chain
                .push(event)
                .then(|| (chain.chunk_count(), chain.len()));
            if allocated.is_some() {
                state.metrics.record_chunk();
            }
            state.metrics.record_event();
            allocated
        });

        if let Some((chunks, events)) = allocated {
            trace!(chunks, events, "perf_timer chunk allocated");
        }
    }

    /// Append a note event
    ///
    /// `name` may be a borrowed `&'n str` or an owned `String`/[`EventName`].
    #[inline]
    pub fn note(&self, name: impl Into<EventName<'n>>, frame_id: i32) {
        self.record(EventKind::Note, name, frame_id);
    }

    /// Open a timed scope that closes when the returned guard drops
    #[inline]
    pub fn scope<'r>(&'r self, name: &'n str, frame_id: i32) -> ScopedTimer<'r, 'n, M> {
        ScopedTimer::new(self, name, frame_id)
    }

    /// Pause or resume recording within the current session
    ///
    /// Resuming has no effect when no session is active. Pausing keeps the
    /// pending events.
    pub fn set_enabled(&self, enabled: bool) {
        M::with(&self.state, |state| {
            let active = enabled && state.chain.is_some();
            self.enabled.store(active, Ordering::Relaxed);
        });
    }

    /// Check if appends are currently recorded
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Check if a session is active, paused or not
    pub fn is_recording(&self) -> bool {
        M::with(&self.state, |state| state.chain.is_some())
    }

    /// Number of pending events
    pub fn event_count(&self) -> usize {
        M::with(&self.state, |state| state.pending())
    }

    /// Number of allocated chunks in the pending chain
    pub fn chunk_count(&self) -> usize {
        M::with(&self.state, |state| {
            state.chain.as_ref().map_or(0, BufferChain::chunk_count)
        })
    }

    /// Destination of the current or last session
    pub fn destination(&self) -> Option<PathBuf> {
        M::with(&self.state, |state| state.destination.clone())
    }

    /// Snapshot of the recorder metrics
    pub fn metrics(&self) -> RecorderMetrics {
        M::with(&self.state, |state| state.metrics)
    }

    /// Recorder configuration
    pub fn config(&self) -> &RecorderConfig {
        &self.config
    }
}

impl<M: ThreadMode> Default for EventRecorder<'_, M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: ThreadMode> Drop for EventRecorder<'_, M> {
    fn drop(&mut self) {
        self.enabled.store(false, Ordering::Relaxed);
        if let Err(e) = self.write() {
            warn!(error = %e, "Failed to flush perf_timer trace on drop");
        }
    }
}

impl<M: ThreadMode> core::fmt::Debug for EventRecorder<'_, M> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let (destination, pending) = M::with(&self.state, |state| {
            (state.destination.clone(), state.pending())
        });
        f.debug_struct("EventRecorder")
            .field("mode", &M::NAME)
            .field("enabled", &self.is_enabled())
            .field("destination", &destination.as_deref().map(Path::display))
            .field("pending_events", &pending)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
