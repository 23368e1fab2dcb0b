//! Payment deadlines.
//!
//! A [`Deadline`] is either cleared or a calendar date. Whether a date is
//! acceptable depends on when it is checked: it must fall after today and no
//! more than a year out. The window is a predicate evaluated on demand, so a
//! stored deadline can stop passing it as time moves on.

use std::fmt;
use std::sync::LazyLock;

use chrono::{Months, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use crate::clock::Clock;
use crate::error::DeadlineError;

static DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("Invalid regex"));

/// How far ahead a deadline may be set.
const WINDOW_MONTHS: u32 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Deadline(Option<NaiveDate>);

impl Deadline {
    pub fn empty() -> Self {
        Self(None)
    }

    pub fn of(date: NaiveDate) -> Self {
        Self(Some(date))
    }

    /// Parse user input. Blank clears the deadline; a date must pass the window check.
    pub fn from_str_at(raw: &str, clock: &dyn Clock) -> Result<Self, DeadlineError> {
        let deadline = Self::restore(raw)?;
        deadline.check(clock)?;
        Ok(deadline)
    }

    pub fn is_valid(raw: &str, clock: &dyn Clock) -> bool {
        Self::from_str_at(raw, clock).is_ok()
    }

    /// Parse a stored value. Only the shape and calendar are checked.
    pub fn restore(raw: &str) -> Result<Self, DeadlineError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(Self::empty());
        }
        if !DATE_PATTERN.is_match(trimmed) {
            return Err(DeadlineError::Format);
        }
        NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .map(Self::of)
            .map_err(|_| DeadlineError::Format)
    }

    /// Re-run the window policy against the clock. Cleared deadlines always pass.
    pub fn check(&self, clock: &dyn Clock) -> Result<(), DeadlineError> {
        match self.0 {
            None => Ok(()),
            Some(date) if within_window(date, clock.today()) => Ok(()),
            Some(date) => {
                debug!(%date, today = %clock.today(), "deadline outside window");
                Err(DeadlineError::Window)
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        self.0
    }

    /// `YYYY-MM-DD`, or an empty string when cleared.
    pub fn to_storage_string(&self) -> String {
        self.to_string()
    }
}

// (today, today + 1 year]
fn within_window(date: NaiveDate, today: NaiveDate) -> bool {
    let Some(limit) = today.checked_add_months(Months::new(WINDOW_MONTHS)) else {
        return false;
    };
    date > today && date <= limit
}

impl fmt::Display for Deadline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            None => Ok(()),
        }
    }
}

impl Serialize for Deadline {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Deadline {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Deadline::restore(&raw).map_err(serde::de::Error::custom)
    }
}
