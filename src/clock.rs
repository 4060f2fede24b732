//! Time source used to compute cookie expiry.
//!
//! [`SystemClock`] is used in production. [`FixedClock`] pins "now" so that
//! expiry timestamps are predictable in tests and replays.

use time::OffsetDateTime;

/// Returns the current time as unix seconds.
pub trait Clock {
    fn now(&self) -> i64;
}

/// Wall clock backed by `OffsetDateTime::now_utc()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        OffsetDateTime::now_utc().unix_timestamp()
    }
}

/// Clock frozen at a given unix timestamp.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now(&self) -> i64 {
        self.0
    }
}
