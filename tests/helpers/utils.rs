use chrono::{TimeZone, Utc};

/// Millis of the given time of day on 2025-01-15 UTC
pub fn at(hour: u32, minute: u32) -> i64 {
    Utc.with_ymd_and_hms(2025, 1, 15, hour, minute, 0)
        .unwrap()
        .timestamp_millis()
}
