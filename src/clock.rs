//! Time source abstraction.

use chrono::{DateTime, Utc};

/// A source of the current instant.
///
/// Session expiry and token verification read time through this trait so
/// tests can substitute [`ManualClock`](crate::testing::ManualClock).
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// The system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
