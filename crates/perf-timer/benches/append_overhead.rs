//! Benchmarks for capture overhead

use std::time::{Duration, Instant};

use criterion::{Criterion, criterion_group, criterion_main};
use perf_timer::{
    Event, EventKind, EventRecorder, MultiThreaded, RecorderConfig, SingleThreaded, format,
};

/// Time `iters` calls of `op` inside a fresh session, then discard the
/// captured events by restarting.
fn timed_session<M: perf_timer::ThreadMode>(
    recorder: &EventRecorder<'static, M>,
    iters: u64,
    mut op: impl FnMut(&EventRecorder<'static, M>, i32),
) -> Duration {
    recorder.start("unused.perf");
    let start = Instant::now();
    for i in 0..iters {
        op(recorder, std::hint::black_box(i32::try_from(i % 1024).unwrap_or(0)));
    }
    let elapsed = start.elapsed();
    recorder.start("unused.perf");
    elapsed
}

fn bench_disabled(c: &mut Criterion) {
    let recorder = EventRecorder::<SingleThreaded>::new();

    c.bench_function("disabled_note", |b| {
        b.iter(|| recorder.note(std::hint::black_box("note"), std::hint::black_box(1)))
    });

    c.bench_function("disabled_scope", |b| {
        b.iter(|| {
            let _scope = recorder.scope(std::hint::black_box("scope"), std::hint::black_box(1));
        })
    });
}

fn bench_enabled(c: &mut Criterion) {
    let single = EventRecorder::<SingleThreaded>::new();
    let multi = EventRecorder::<MultiThreaded>::new();

    c.bench_function("note_single_threaded", |b| {
        b.iter_custom(|iters| timed_session(&single, iters, |r, frame| r.note("note", frame)))
    });

    c.bench_function("note_owned_single_threaded", |b| {
        b.iter_custom(|iters| {
            timed_session(&single, iters, |r, frame| r.note(format!("n{frame}"), frame))
        })
    });

    c.bench_function("scope_single_threaded", |b| {
        b.iter_custom(|iters| {
            timed_session(&single, iters, |r, frame| {
                let _scope = r.scope("scope", frame);
            })
        })
    });

    c.bench_function("note_multithreaded_uncontended", |b| {
        b.iter_custom(|iters| timed_session(&multi, iters, |r, frame| r.note("note", frame)))
    });
}

fn bench_chunk_capacity(c: &mut Criterion) {
    for capacity in [64usize, 4_096, 32_768] {
        let Ok(config) = RecorderConfig::builder().buffer_capacity(capacity).build() else {
            continue;
        };
        let Ok(recorder) = EventRecorder::<SingleThreaded>::with_config(config) else {
            continue;
        };
        c.bench_function(&format!("note_capacity_{capacity}"), |b| {
            b.iter_custom(|iters| timed_session(&recorder, iters, |r, frame| r.note("n", frame)))
        });
    }
}

fn bench_encoding(c: &mut Criterion) {
    let events: Vec<Event<'static>> = (0..1_024)
        .map(|i| Event::new(EventKind::Note, 0, i, i64::from(i), "encode"))
        .collect();
    let mut out = Vec::with_capacity(64 * 1_024);

    c.bench_function("encode_1024_events", |b| {
        b.iter(|| {
            out.clear();
            let mut bytes = format::write_header(&mut out, events.len()).unwrap_or(0);
            for event in &events {
                bytes += format::write_event(&mut out, event).unwrap_or(0);
            }
            std::hint::black_box(bytes)
        })
    });
}

criterion_group!(
    benches,
    bench_disabled,
    bench_enabled,
    bench_chunk_capacity,
    bench_encoding,
);

criterion_main!(benches);
