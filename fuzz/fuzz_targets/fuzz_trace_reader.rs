//! Fuzzes the perf_timer trace decoder.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_trace_reader
#![no_main]
use libfuzzer_sys::fuzz_target;
use perf_timer::TraceReader;

fuzz_target!(|data: &[u8]| {
    // Must never panic on arbitrary bytes. Errors are expected.
    let Ok(reader) = TraceReader::new(data) else {
        return;
    };
    for event in reader {
        if event.is_err() {
            break;
        }
    }
});
