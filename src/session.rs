//! Training session slots.
//!
//! A [`Session`] is one scheduling rule: a single appointment, a weekly or
//! every-other-week slot, or a fixed calendar day each month. Values are
//! immutable; changing a client's schedule means parsing a new one.
//!
//! Biweekly slots carry no start week, so conflict checks and next-occurrence
//! lookups treat them exactly like weekly slots.

use std::fmt;

use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Serialize, Serializer};
use tracing::debug;

use crate::clock::Clock;
use crate::error::SessionError;
use crate::recurrence::{self, weekday_token};

/// Months searched when a monthly slot is checked against a weekly one.
pub const MONTH_LOOKAHEAD: u32 = 24;

/// Calendar day of the month, 1..=31.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DayOfMonth(u8);

impl DayOfMonth {
    pub fn new(day: u32) -> Option<Self> {
        (1..=31).contains(&day).then_some(Self(day as u8))
    }

    pub fn get(self) -> u32 {
        u32::from(self.0)
    }

    /// This day within the month of `month_start`, if the month is long enough.
    fn in_month_of(self, month_start: NaiveDate) -> Option<NaiveDate> {
        month_start.with_day(self.get())
    }
}

impl fmt::Display for DayOfMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Session {
    OneOff(NaiveDateTime),
    Weekly { day: Weekday, time: NaiveTime },
    Biweekly { day: Weekday, time: NaiveTime },
    Monthly { day: DayOfMonth, time: NaiveTime },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionKind {
    OneOff,
    Weekly,
    Biweekly,
    Monthly,
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SessionKind::OneOff => "ONE_OFF",
            SessionKind::Weekly => "WEEKLY",
            SessionKind::Biweekly => "BIWEEKLY",
            SessionKind::Monthly => "MONTHLY",
        })
    }
}

impl Session {
    /// Parse a raw session string against the clock's current instant.
    pub fn parse(raw: &str, clock: &dyn Clock) -> Result<Self, SessionError> {
        recurrence::parse(raw, clock.now())
    }

    pub fn is_valid(raw: &str, clock: &dyn Clock) -> bool {
        Self::parse(raw, clock).is_ok()
    }

    /// Parse a stored value. Same grammar as [`Session::parse`], but a one-off
    /// slot that has already passed is kept rather than refused.
    pub fn restore(raw: &str) -> Result<Self, SessionError> {
        recurrence::parse(raw, NaiveDateTime::MIN)
    }

    pub fn kind(&self) -> SessionKind {
        match self {
            Session::OneOff(_) => SessionKind::OneOff,
            Session::Weekly { .. } => SessionKind::Weekly,
            Session::Biweekly { .. } => SessionKind::Biweekly,
            Session::Monthly { .. } => SessionKind::Monthly,
        }
    }

    pub fn time(&self) -> NaiveTime {
        match self {
            Session::OneOff(at) => at.time(),
            Session::Weekly { time, .. }
            | Session::Biweekly { time, .. }
            | Session::Monthly { time, .. } => *time,
        }
    }

    fn weekday(&self) -> Option<Weekday> {
        match self {
            Session::Weekly { day, .. } | Session::Biweekly { day, .. } => Some(*day),
            _ => None,
        }
    }

    /// Normalized form used for storage and display.
    pub fn canonical_string(&self) -> String {
        self.to_string()
    }

    /// Does this session fire at exactly `at`?
    pub fn occurs_at(&self, at: NaiveDateTime) -> bool {
        match self {
            Session::OneOff(own) => *own == at,
            Session::Weekly { day, time } | Session::Biweekly { day, time } => {
                at.weekday() == *day && at.time() == *time
            }
            Session::Monthly { day, time } => at.day() == day.get() && at.time() == *time,
        }
    }

    /// Whether the two slots collide. Symmetric and never fails.
    ///
    /// The clock only matters for monthly vs weekly slots, where the monthly
    /// day is searched over [`MONTH_LOOKAHEAD`] months starting this month.
    pub fn conflicts_with(&self, other: &Session, clock: &dyn Clock) -> bool {
        let conflict = match (self, other) {
            (Session::OneOff(at), rest) | (rest, Session::OneOff(at)) => rest.occurs_at(*at),
            (Session::Monthly { day: a, time: ta }, Session::Monthly { day: b, time: tb }) => {
                a == b && ta == tb
            }
            (Session::Monthly { day, time }, recurring)
            | (recurring, Session::Monthly { day, time }) => {
                *time == recurring.time()
                    && recurring
                        .weekday()
                        .is_some_and(|weekday| lands_on_weekday(*day, weekday, clock.today()))
            }
            (a, b) => a.weekday() == b.weekday() && a.time() == b.time(),
        };

        if conflict {
            debug!(a = %self, b = %other, "session conflict");
        }
        conflict
    }

    /// The soonest instant strictly after now at which this session fires.
    ///
    /// Only used for ordering. A one-off session in the past has none.
    pub fn next_occurrence(&self, clock: &dyn Clock) -> Option<NaiveDateTime> {
        let now = clock.now();
        match self {
            Session::OneOff(at) => (*at > now).then_some(*at),
            Session::Weekly { day, time } | Session::Biweekly { day, time } => {
                next_weekday_at(*day, *time, now)
            }
            Session::Monthly { day, time } => next_monthly_at(*day, *time, now),
        }
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Session::OneOff(at) => write!(f, "{}", at.format("%Y-%m-%d %H:%M")),
            Session::Weekly { day, time } => {
                write!(f, "WEEKLY:{} {}", weekday_token(*day), time.format("%H:%M"))
            }
            Session::Biweekly { day, time } => {
                write!(f, "BIWEEKLY:{} {}", weekday_token(*day), time.format("%H:%M"))
            }
            Session::Monthly { day, time } => {
                write!(f, "MONTHLY:{} {}", day, time.format("%H:%M"))
            }
        }
    }
}

impl Serialize for Session {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// Does `day` fall on `weekday` in any of the lookahead months from `today`'s month?
// Months too short to contain the day are skipped.
fn lands_on_weekday(day: DayOfMonth, weekday: Weekday, today: NaiveDate) -> bool {
    let Some(first) = today.with_day(1) else {
        return false;
    };
    (0..MONTH_LOOKAHEAD)
        .filter_map(|i| first.checked_add_months(Months::new(i)))
        .filter_map(|month| day.in_month_of(month))
        .any(|date| date.weekday() == weekday)
}

fn next_weekday_at(day: Weekday, time: NaiveTime, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let today = now.date();
    let ahead = (7 + day.num_days_from_monday() - today.weekday().num_days_from_monday()) % 7;
    let candidate = today.checked_add_days(Days::new(u64::from(ahead)))?.and_time(time);
    if candidate > now {
        Some(candidate)
    } else {
        candidate.checked_add_days(Days::new(7))
    }
}

// Any day 1..=31 shows up at least once in three consecutive months,
// so a year of candidates is plenty.
fn next_monthly_at(day: DayOfMonth, time: NaiveTime, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let first = now.date().with_day(1)?;
    (0..=12)
        .filter_map(|i| first.checked_add_months(Months::new(i)))
        .filter_map(|month| day.in_month_of(month))
        .map(|date| date.and_time(time))
        .find(|candidate| *candidate > now)
}
