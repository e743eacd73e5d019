//! Past determination for reminder instants.
//!
//! Reminder instants are clinic-local wall-clock times carried on the UTC
//! axis (a 09:00 dose is stored as `09:00Z`). Deciding whether one has
//! already passed therefore compares it against the *local* wall clock,
//! not against true UTC.

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;

use crate::config::DEFAULT_LOCAL_OFFSET_HOURS;

/// `notify_at < now_utc - 4h`. Strict: an instant exactly at the local
/// "now" is not past.
pub fn is_past(notify_at: DateTime<Utc>, now_utc: DateTime<Utc>) -> bool {
    LocalClock::default().is_past(notify_at, now_utc)
}

/// How clinic-local time is derived from UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalClock {
    /// Local time is UTC minus this fixed amount. No DST handling.
    FixedOffset(Duration),
    /// Local time follows an IANA zone, including DST transitions.
    Zone(Tz),
}

impl Default for LocalClock {
    fn default() -> Self {
        LocalClock::FixedOffset(Duration::hours(DEFAULT_LOCAL_OFFSET_HOURS))
    }
}

impl LocalClock {
    /// Local wall-clock time at `now_utc`, expressed on the UTC axis.
    pub fn now_local(&self, now_utc: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            LocalClock::FixedOffset(offset) => now_utc - *offset,
            LocalClock::Zone(tz) => now_utc.with_timezone(tz).naive_local().and_utc(),
        }
    }

    pub fn is_past(&self, notify_at: DateTime<Utc>, now_utc: DateTime<Utc>) -> bool {
        notify_at < self.now_local(now_utc)
    }
}

/// Source of the current UTC time.
pub trait Clock: Send + Sync {
    fn now_utc(&self) -> DateTime<Utc>;
}

/// Wall clock of the host.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now_utc(&self) -> DateTime<Utc> {
        self.0
    }
}
