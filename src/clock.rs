/*
Source of "now" for everything time-dependent.
Passed explicitly so tests can freeze time without touching globals.
*/

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};

/// Anything that can report the current local wall-clock instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

// Local -> FixedOffset (current system offset), then drop the offset.
// Sessions and deadlines are wall-clock values, so the offset only matters
// for reading the system time correctly.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    fn now_fixed_offset() -> DateTime<FixedOffset> {
        let local = chrono::Local::now();
        local.fixed_offset()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Self::now_fixed_offset().naive_local()
    }
}

/// A clock stuck at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(NaiveDateTime);

impl FixedClock {
    pub fn at(instant: NaiveDateTime) -> Self {
        Self(instant)
    }

    /// Midnight at the start of `date`.
    pub fn on(date: NaiveDate) -> Self {
        Self(date.and_time(chrono::NaiveTime::MIN))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_reports_its_instant() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let clock = FixedClock::on(date);
        assert_eq!(clock.today(), date);
        assert_eq!(clock.now(), date.and_hms_opt(0, 0, 0).unwrap());
    }

    #[test]
    fn system_clock_moves_forward() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
