//! services/portal/src/adapters/clock.rs
//!
//! The production time source for the navigation tracker.

use chrono::Utc;
use portal_core::ports::Clock;

/// A `Clock` implementation backed by the system clock.
#[derive(Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}
