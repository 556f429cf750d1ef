//! Clock port - the current time as seen by handlers.
//!
//! Booking windows and webhook bookkeeping depend on "now"; injecting it keeps
//! those rules testable against fixed dates.

use crate::domain::foundation::Timestamp;

pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    time: Timestamp,
}

impl FixedClock {
    pub const fn new(time: Timestamp) -> Self {
        Self { time }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.time
    }
}
