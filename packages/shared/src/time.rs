//! Wall-clock access for room timestamps.
//!
//! Rooms record when they were created; the server reads time through
//! [`Clock`] so tests can pin it.

use chrono::{TimeZone, Utc};

/// Source of Unix time in milliseconds (UTC).
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

/// Reads the operating system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        now_millis()
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(i64);

impl FixedClock {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.0
    }
}

pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Format Unix milliseconds as RFC 3339 in UTC.
///
/// Out-of-range timestamps fall back to the Unix epoch.
pub fn timestamp_to_rfc3339(timestamp_millis: i64) -> String {
    Utc.timestamp_millis_opt(timestamp_millis)
        .single()
        .unwrap_or_default()
        .to_rfc3339()
}
