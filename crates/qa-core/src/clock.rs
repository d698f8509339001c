//! Timestamp source for new log records.

use chrono::{Local, NaiveDateTime};
use std::sync::Mutex;

/// `isoformat()`-style local timestamp with microseconds and no offset.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Wall clock that never goes backwards within one process.
///
/// If the system clock steps back (NTP, manual change) the last issued value
/// is reused, so the log stays non-decreasing in write order.
#[derive(Debug, Default)]
pub struct MonotonicClock {
    last: Mutex<Option<NaiveDateTime>>,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next timestamp, formatted with [`TIMESTAMP_FORMAT`].
    pub fn now(&self) -> String {
        self.observe(Local::now().naive_local())
            .format(TIMESTAMP_FORMAT)
            .to_string()
    }

    fn observe(&self, candidate: NaiveDateTime) -> NaiveDateTime {
        let mut last = self.last.lock().unwrap_or_else(|e| e.into_inner());
        let issued = match *last {
            Some(prev) if prev > candidate => prev,
            _ => candidate,
        };
        *last = Some(issued);
        issued
    }
}
