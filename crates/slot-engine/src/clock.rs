//! Current-time sources for the past-time rule.
//!
//! All times in this crate are local wall-clock [`NaiveDateTime`] values: the
//! evaluated day, its appointments and "now" share one calendar and one clock.

use chrono::{Local, NaiveDateTime};

/// Source of the current instant.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Reads the system's local wall clock on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock pinned to one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
