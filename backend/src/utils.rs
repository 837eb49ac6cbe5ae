// Shared utility helpers for timestamps, sequencing, and display formatting.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use tokio::time::Instant;

pub fn now_epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

pub fn monotonic_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

pub fn next_sequence(sequence: &AtomicU64) -> u64 {
    sequence.fetch_add(1, Ordering::Relaxed) + 1
}

/// Formats a lap time as `m:ss.mmm` for lap titles and table rows.
pub fn format_lap_time(lap_time_ms: u64) -> String {
    let minutes = lap_time_ms / 60_000;
    let seconds = (lap_time_ms % 60_000) / 1_000;
    let millis = lap_time_ms % 1_000;
    format!("{}:{:02}.{:03}", minutes, seconds, millis)
}
