use chrono::prelude::*;
use serde::{Deserialize, Serialize};
use std::error::Error;

/// A closed time window `[start_ts, end_ts]` in epoch millis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSpan {
    start_ts: i64,
    end_ts: i64,
}

impl TimeSpan {
    /// Does not validate the ordering of `start_ts` and `end_ts`, stored events
    /// are allowed to end before they start.
    pub fn new(start_ts: i64, end_ts: i64) -> Self {
        Self { start_ts, end_ts }
    }

    pub fn create(start_ts: i64, end_ts: i64) -> Result<Self, InvalidTimeSpanError> {
        if start_ts > end_ts {
            Err(InvalidTimeSpanError(start_ts, end_ts))
        } else {
            Ok(Self { start_ts, end_ts })
        }
    }

    pub fn start(&self) -> i64 {
        self.start_ts
    }

    pub fn end(&self) -> i64 {
        self.end_ts
    }

    /// Two spans overlap when they share at least one instant. Boundaries are
    /// inclusive, so a span ending at the exact millisecond another one starts
    /// is overlapping.
    pub fn overlaps(&self, other: &TimeSpan) -> bool {
        self.start_ts <= other.end_ts && other.start_ts <= self.end_ts
    }

    /// `None` when either bound is outside of the range chrono can represent
    pub fn as_datetime(&self) -> Option<TimeSpanDateTime> {
        let start = Utc.timestamp_millis_opt(self.start_ts).single()?;
        let end = Utc.timestamp_millis_opt(self.end_ts).single()?;
        Some(TimeSpanDateTime { start, end })
    }
}

impl std::fmt::Display for TimeSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.as_datetime() {
            Some(dt) => write!(f, "{} - {}", dt.start.to_rfc3339(), dt.end.to_rfc3339()),
            None => write!(f, "{} - {}", self.start_ts, self.end_ts),
        }
    }
}

#[derive(Debug)]
pub struct InvalidTimeSpanError(i64, i64);

impl Error for InvalidTimeSpanError {}

impl std::fmt::Display for InvalidTimeSpanError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "Provided timespan start_ts: {} and end_ts: {} is invalid. The start must not be after the end.",
            self.0, self.1
        )
    }
}

#[derive(Debug)]
pub struct TimeSpanDateTime {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}
