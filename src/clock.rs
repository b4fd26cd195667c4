use chrono::{DateTime, SecondsFormat, Utc};

/// Source of the current time, in milliseconds since the Unix epoch.
pub trait Clock {
    fn now_millis(&self) -> i64;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.0
    }
}

/// Largest distance from the epoch an ECMAScript `Date` can represent.
const MAX_DATE_MILLIS: i64 = 8_640_000_000_000_000;

/// Render epoch milliseconds as `YYYY-MM-DDTHH:MM:SS.mmmZ`, `None` when out of range.
pub fn format_iso8601(millis: i64) -> Option<String> {
    if !(-MAX_DATE_MILLIS..=MAX_DATE_MILLIS).contains(&millis) {
        return None;
    }
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
}
