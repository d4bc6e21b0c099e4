//! Call-site macros
//!
//! With the `enabled` feature off, [`perf_scope!`] and [`perf_note!`] expand
//! to nothing: neither the recorder nor the arguments are evaluated.

/// Fully qualified path of the enclosing function
///
/// # Example
///
/// ```rust,ignore
/// fn update() {
///     assert!(perf_timer::function_name!().ends_with("update"));
/// }
/// ```
#[macro_export]
macro_rules! function_name {
    () => {{
        fn __perf_timer_marker() {}
        let name = ::core::any::type_name_of_val(&__perf_timer_marker);
        name.strip_suffix("::__perf_timer_marker").unwrap_or(name)
    }};
}

/// Time the rest of the enclosing block
///
/// Without a name the scope is labelled with the enclosing function path.
///
/// # Example
///
/// ```rust,ignore
/// use perf_timer::{EventRecorder, perf_scope};
///
/// fn physics(recorder: &EventRecorder<'static>, frame: i32) {
///     perf_scope!(recorder, frame);
///     perf_scope!(recorder, "broadphase", frame);
/// }
/// ```
#[cfg(feature = "enabled")]
#[macro_export]
macro_rules! perf_scope {
    ($recorder:expr, $frame_id:expr $(,)?) => {
        let _perf_scope_guard =
            $crate::ScopedTimer::new(&$recorder, $crate::function_name!(), $frame_id);
    };
    ($recorder:expr, $name:expr, $frame_id:expr $(,)?) => {
        let _perf_scope_guard = $crate::ScopedTimer::new(&$recorder, $name, $frame_id);
    };
}

/// Time the rest of the enclosing block (compiled out)
#[cfg(not(feature = "enabled"))]
#[macro_export]
macro_rules! perf_scope {
    ($recorder:expr, $frame_id:expr $(,)?) => {};
    ($recorder:expr, $name:expr, $frame_id:expr $(,)?) => {};
}

/// Record a note
///
/// The name may be a `&str` or an owned `String`.
///
/// # Example
///
/// ```rust,ignore
/// use perf_timer::{EventRecorder, perf_note};
///
/// let recorder: EventRecorder = EventRecorder::new();
/// perf_note!(recorder, "gc", 12);
/// perf_note!(recorder, format!("load {}", "level1"), 12);
/// ```
#[cfg(feature = "enabled")]
#[macro_export]
macro_rules! perf_note {
    ($recorder:expr, $name:expr, $frame_id:expr $(,)?) => {
        $crate::note(&$recorder, $name, $frame_id)
    };
}

/// Record a note (compiled out)
#[cfg(not(feature = "enabled"))]
#[macro_export]
macro_rules! perf_note {
    ($recorder:expr, $name:expr, $frame_id:expr $(,)?) => {};
}
