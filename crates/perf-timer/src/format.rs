//! perf_timer binary trace encoding
//!
//! All integers are little-endian. Widths are fixed:
//!
//! | Field        | Size | Type  |
//! |--------------|------|-------|
//! | magic        | 4    | `u32` = `0xFA57` |
//! | event count  | 4    | `i32` |
//!
//! followed by `event count` records:
//!
//! | Field        | Size            | Type  |
//! |--------------|-----------------|-------|
//! | kind         | 1               | `u8` (0 enter, 1 exit, 2 note) |
//! | thread id    | 8               | `u64` |
//! | frame id     | 4               | `i32` |
//! | timestamp    | 8               | `i64` |
//! | name length  | 2               | `i16` |
//! | name bytes   | name length     | raw, no terminator |
//!
//! Names longer than [`MAX_NAME_LEN`] bytes are truncated to their first
//! `MAX_NAME_LEN` bytes. Keep labels under that limit.

use std::io::Write;

use crate::error::{PerfTimerError, Result};
use crate::events::Event;

/// Magic value opening every trace
pub const MAGIC: u32 = 0xFA57;

/// Size of the file header in bytes
pub const HEADER_LEN: usize = 8;

/// Size of a record's fixed fields, name length included
pub const RECORD_FIXED_LEN: usize = 1 + 8 + 4 + 8 + 2;

/// Longest name the length field can describe (`i16::MAX`)
pub const MAX_NAME_LEN: usize = 32_767;

/// Name bytes as they will be stored, clamped to [`MAX_NAME_LEN`]
#[inline]
pub fn encoded_name(name: &[u8]) -> &[u8] {
    name.get(..MAX_NAME_LEN).unwrap_or(name)
}

/// Write the trace header
///
/// # Errors
///
/// Returns [`PerfTimerError::EventCountOverflow`] if `event_count` does not
/// fit the count field, or an I/O error from `out`.
pub fn write_header<W: Write>(out: &mut W, event_count: usize) -> Result<usize> {
    let count =
        i32::try_from(event_count).map_err(|_overflow| PerfTimerError::EventCountOverflow(event_count))?;

    let mut header = [0u8; HEADER_LEN];
    let (magic, rest) = header.split_at_mut(4);
    magic.copy_from_slice(&MAGIC.to_le_bytes());
    rest.copy_from_slice(&count.to_le_bytes());
    out.write_all(&header)?;
    Ok(HEADER_LEN)
}

/// Fixed-field prefix of one record
fn record_prefix(event: &Event<'_>, name_len: i16) -> [u8; RECORD_FIXED_LEN] {
    let mut buf = [0u8; RECORD_FIXED_LEN];
    let (kind, rest) = buf.split_at_mut(1);
    let (thread, rest) = rest.split_at_mut(8);
    let (frame, rest) = rest.split_at_mut(4);
    let (timestamp, len) = rest.split_at_mut(8);

    kind.copy_from_slice(&[event.kind.as_byte()]);
    thread.copy_from_slice(&event.thread_id.to_le_bytes());
    frame.copy_from_slice(&event.frame_id.to_le_bytes());
    timestamp.copy_from_slice(&event.timestamp_ns.to_le_bytes());
    len.copy_from_slice(&name_len.to_le_bytes());
    buf
}

/// Write one event record, returning the number of bytes written
///
/// # Errors
///
/// Returns an I/O error from `out`.
pub fn write_event<W: Write>(out: &mut W, event: &Event<'_>) -> Result<usize> {
    let name = encoded_name(event.name.as_bytes());
    // Clamped above, so the conversion cannot fail.
    let name_len = i16::try_from(name.len()).unwrap_or(i16::MAX);

    out.write_all(&record_prefix(event, name_len))?;
    out.write_all(name)?;
    Ok(RECORD_FIXED_LEN.saturating_add(name.len()))
}
