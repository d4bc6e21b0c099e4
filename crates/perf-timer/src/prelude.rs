//! Prelude for perf-timer
//!
//! This module re-exports the most commonly used types and macros.
//!
//! # Example
//!
//! ```rust,ignore
//! use perf_timer::prelude::*;
//!
//! let recorder: EventRecorder = EventRecorder::new();
//! recorder.start("trace.perf");
//! perf_scope!(recorder, "load", 0);
//! ```

pub use crate::{
    EventKind, EventName, EventRecorder, MultiThreaded, PerfTimerError, RecorderConfig,
    RecorderMetrics, ScopedTimer, SingleThreaded, WriteSummary, function_name, note, perf_note,
    perf_scope,
};
