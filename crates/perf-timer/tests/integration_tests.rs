//! Integration tests for perf-timer sessions

use std::fs;
use std::path::Path;

use perf_timer::{
    EventKind, EventName, EventRecorder, PerfTimerError, RecorderConfig, SingleThreaded,
    read_trace,
};

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn init_logging() {
    tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init()
        .unwrap_or_default();
}

fn recorder() -> EventRecorder<'static, SingleThreaded> {
    init_logging();
    EventRecorder::new()
}

fn kinds_and_names(path: &Path) -> perf_timer::Result<Vec<(EventKind, String)>> {
    Ok(read_trace(path)?
        .into_iter()
        .map(|e| (e.kind, e.name_lossy().into_owned()))
        .collect())
}

#[test]
fn test_nested_scopes_scenario() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("nested.perf");
    let recorder = recorder();

    recorder.start(&path);
    {
        let _a = recorder.scope("A", 1);
        {
            let _b = recorder.scope("B", 1);
        }
    }
    let summary = recorder.end()?.ok_or("expected a trace")?;
    assert_eq!(summary.events, 4);
    assert_eq!(summary.path, path);

    let bytes = fs::read(&path)?;
    assert_eq!(bytes.get(..4), Some(&0xFA57u32.to_le_bytes()[..]));
    assert_eq!(bytes.get(4..8), Some(&4i32.to_le_bytes()[..]));

    assert_eq!(
        kinds_and_names(&path)?,
        vec![
            (EventKind::EnterContext, "A".to_string()),
            (EventKind::EnterContext, "B".to_string()),
            (EventKind::ExitContext, "B".to_string()),
            (EventKind::ExitContext, "A".to_string()),
        ]
    );

    let metrics = recorder.metrics();
    assert_eq!(metrics.events_recorded, 4);
    assert_eq!(metrics.events_written, 4);
    assert_eq!(metrics.traces_written, 1);
    Ok(())
}

#[test]
fn test_timestamps_non_decreasing_within_thread() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("monotonic.perf");
    let recorder = recorder();

    recorder.start(&path);
    for frame in 0..50 {
        let _frame = recorder.scope("frame", frame);
        recorder.note("tick", frame);
    }
    recorder.end()?;

    let events = read_trace(&path)?;
    assert_eq!(events.len(), 150);
    assert!(
        events
            .windows(2)
            .all(|pair| matches!(pair, [a, b] if a.timestamp_ns <= b.timestamp_ns))
    );
    assert!(events.iter().all(|e| e.thread_id == 0));
    Ok(())
}

#[test]
fn test_empty_session_creates_no_file() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("empty.perf");
    let recorder = recorder();

    recorder.start(&path);
    assert_eq!(recorder.end()?, None);
    assert!(!path.exists());
    Ok(())
}

#[test]
fn test_empty_session_leaves_existing_file_untouched() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("existing.perf");
    fs::write(&path, b"previous trace")?;
    let recorder = recorder();

    recorder.start(&path);
    assert_eq!(recorder.end()?, None);
    assert_eq!(fs::read(&path)?, b"previous trace");
    Ok(())
}

#[test]
fn test_disabled_recorder_is_inert() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("never.perf");
    let recorder = recorder();

    {
        let _scope = recorder.scope("idle", 0);
        recorder.note("idle", 0);
        recorder.note(String::from("owned"), 0);
    }
    assert_eq!(recorder.event_count(), 0);
    assert_eq!(recorder.write()?, None);

    recorder.start(&path);
    recorder.end()?;
    recorder.note("after end", 1);
    assert_eq!(recorder.event_count(), 0);
    assert_eq!(recorder.metrics().events_recorded, 0);
    assert!(!path.exists());
    Ok(())
}

#[test]
fn test_owned_name_round_trip() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("owned.perf");
    let recorder = recorder();

    let name = format!("level {} loaded in {}ms", 3, 120);
    recorder.start(&path);
    recorder.note(name.clone(), 5);
    recorder.note(EventName::clone_str(&name)?, 6);
    recorder.end()?;

    let events = read_trace(&path)?;
    assert_eq!(events.len(), 2);
    for event in &events {
        assert_eq!(event.name, name.as_bytes());
        assert_eq!(event.kind, EventKind::Note);
    }
    Ok(())
}

#[test]
fn test_borrowed_names_from_caller_storage() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("borrowed.perf");
    let labels = vec![String::from("load"), String::from("parse")];
    let recorder = EventRecorder::<SingleThreaded>::new();

    recorder.start(&path);
    for (frame, label) in (0..).zip(&labels) {
        let _scope = recorder.scope(label.as_str(), frame);
    }
    recorder.end()?;

    let names: Vec<String> = kinds_and_names(&path)?.into_iter().map(|(_, n)| n).collect();
    assert_eq!(names, vec!["load", "load", "parse", "parse"]);
    Ok(())
}

#[test]
fn test_name_length_limit() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("long.perf");
    let recorder = recorder();

    let fits = "f".repeat(32_767);
    let too_long = "t".repeat(32_768);
    recorder.start(&path);
    recorder.note(fits.clone(), 0);
    recorder.note(too_long.clone(), 0);
    recorder.end()?;

    let events = read_trace(&path)?;
    let lengths: Vec<usize> = events.iter().map(|e| e.name.len()).collect();
    assert_eq!(lengths, vec![32_767, 32_767]);
    assert_eq!(events.first().map(|e| e.name.as_slice()), Some(fits.as_bytes()));
    assert_eq!(
        events.get(1).map(|e| e.name.as_slice()),
        too_long.as_bytes().get(..32_767)
    );
    Ok(())
}

#[test]
fn test_capacity_boundary_allocates_one_successor() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("boundary.perf");
    let config = RecorderConfig::builder().buffer_capacity(4).build()?;
    let recorder = EventRecorder::<SingleThreaded>::with_config(config)?;

    recorder.start(&path);
    for frame in 0..4 {
        recorder.note("n", frame);
    }
    assert_eq!(recorder.chunk_count(), 2);
    assert_eq!(recorder.event_count(), 4);

    let summary = recorder.end()?.ok_or("expected a trace")?;
    assert_eq!(summary.chunks, 2);

    let frames: Vec<i32> = read_trace(&path)?.iter().map(|e| e.frame_id).collect();
    assert_eq!(frames, vec![0, 1, 2, 3]);
    assert_eq!(recorder.metrics().chunks_allocated, 2);
    Ok(())
}

#[test]
fn test_unopenable_destination_keeps_events() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("missing").join("dir").join("t.perf");
    let recorder = recorder();

    recorder.start(&path);
    recorder.note("kept", 0);

    let err = recorder.write().err().ok_or("expected a destination error")?;
    assert!(matches!(err, PerfTimerError::DestinationUnavailable { .. }));
    assert!(err.is_recoverable());
    assert_eq!(recorder.event_count(), 1);

    let err = recorder.end().err().ok_or("expected a destination error")?;
    assert!(matches!(err, PerfTimerError::DestinationUnavailable { .. }));
    assert_eq!(recorder.event_count(), 0);
    assert!(!recorder.is_recording());
    assert_eq!(recorder.metrics().events_discarded, 1);
    Ok(())
}

#[test]
fn test_restart_discards_previous_session() -> TestResult {
    let dir = tempfile::tempdir()?;
    let first = dir.path().join("first.perf");
    let second = dir.path().join("second.perf");
    let recorder = recorder();

    recorder.start(&first);
    recorder.note("lost", 0);
    recorder.note("lost", 0);
    recorder.start(&second);
    recorder.note("kept", 1);
    recorder.end()?;

    assert!(!first.exists());
    assert_eq!(
        kinds_and_names(&second)?,
        vec![(EventKind::Note, "kept".to_string())]
    );

    let metrics = recorder.metrics();
    assert_eq!(metrics.sessions_started, 2);
    assert_eq!(metrics.events_discarded, 2);
    assert_eq!(metrics.events_pending(), 0);
    Ok(())
}

#[test]
fn test_drop_flushes_pending_events() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("dropped.perf");

    {
        let recorder = recorder();
        recorder.start(&path);
        recorder.note("flushed", 9);
    }

    let events = read_trace(&path)?;
    assert_eq!(events.len(), 1);
    assert_eq!(events.first().map(|e| e.frame_id), Some(9));
    Ok(())
}

#[test]
fn test_pause_and_resume() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("paused.perf");
    let recorder = recorder();

    recorder.start(&path);
    recorder.note("before", 0);
    recorder.set_enabled(false);
    assert!(recorder.is_recording());
    recorder.note("paused", 1);
    recorder.set_enabled(true);
    recorder.note("after", 2);
    recorder.end()?;

    let names: Vec<String> = kinds_and_names(&path)?.into_iter().map(|(_, n)| n).collect();
    assert_eq!(names, vec!["before", "after"]);
    Ok(())
}

#[test]
fn test_invalid_config_rejected() {
    let config = RecorderConfig {
        buffer_capacity: 0,
    };
    let result = EventRecorder::<SingleThreaded>::with_config(config);
    assert!(matches!(
        result,
        Err(PerfTimerError::InvalidConfiguration(_))
    ));
}

#[test]
fn test_config_deserializes_with_defaults() -> TestResult {
    let config: RecorderConfig = serde_json::from_str("{}")?;
    assert_eq!(config, RecorderConfig::default());

    let config: RecorderConfig = serde_json::from_str(r#"{"buffer_capacity": 128}"#)?;
    assert_eq!(config.buffer_capacity, 128);
    config.validate()?;
    Ok(())
}
