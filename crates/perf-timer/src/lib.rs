//! Low-overhead scope and note capture for frame-based programs
//!
//! Call sites mark timed scopes and point-in-time notes tagged with a
//! caller-supplied frame id. The [`EventRecorder`] buffers them as
//! timestamped events in fixed-capacity chunks and, when the session ends,
//! serializes them to the compact perf_timer binary trace format
//! (see [`format`]).
//!
//! # Overhead
//!
//! - While recording is disabled every call is a single relaxed atomic
//!   load. The clock is not read and nothing is stored.
//! - With the `enabled` feature off, [`perf_scope!`] and [`perf_note!`]
//!   expand to nothing.
//! - Static labels are stored by reference. Only dynamically built names
//!   are owned by the recorder.
//!
//! # Thread modes
//!
//! [`SingleThreaded`] (default) takes no lock and makes the recorder
//! `!Sync`. [`MultiThreaded`] (default with the `multithreaded` feature)
//! serializes appends from every thread through one mutex.
//!
//! # Example
//!
//! ```rust,ignore
//! use perf_timer::prelude::*;
//!
//! let recorder: EventRecorder = EventRecorder::new();
//! recorder.start("game.perf");
//!
//! for frame in 0..60 {
//!     perf_scope!(recorder, "frame", frame);
//!     perf_note!(recorder, format!("entities={}", 42), frame);
//! }
//!
//! recorder.end()?;
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod macros;

pub mod buffer;
pub mod config;
pub mod error;
pub mod events;
pub mod format;
pub mod metrics;
pub mod mode;
pub mod platform;
pub mod prelude;
pub mod reader;
pub mod recorder;
pub mod scope;

pub use buffer::{BufferChain, DEFAULT_BUFFER_CAPACITY, EventBuffer};
pub use config::{MAX_BUFFER_CAPACITY, RecorderConfig, RecorderConfigBuilder};
pub use error::{PerfTimerError, Result};
pub use events::{Event, EventKind, EventName};
pub use metrics::RecorderMetrics;
pub use mode::{DefaultMode, MultiThreaded, SingleThreaded, ThreadMode};
pub use platform::{Clock, ManualClock, MonotonicClock, ThreadIdentity};
pub use reader::{DecodedEvent, TraceReader, read_trace};
pub use recorder::{EventRecorder, WriteSummary};
pub use scope::{ScopedTimer, note};
