/*
Session grammar.
    YYYY-MM-DD HH:MM                    one-off
    (WEEKLY|BIWEEKLY):DOW HH:MM         weekly / every other week
    MONTHLY:DD HH:MM                    calendar day each month
Keyword and day token are case-insensitive.
*/

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use regex::Regex;
use tracing::debug;

use crate::error::SessionError;
use crate::session::{DayOfMonth, Session};

static ONE_OFF_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<date>[0-9]{4}-[0-9]{2}-[0-9]{2})\s+(?P<time>[0-9]{2}:[0-9]{2})$")
        .expect("Invalid regex")
});

// Matched against the uppercased input.
static RECURRING_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<kind>WEEKLY|BIWEEKLY|MONTHLY):(?P<rule>\S+)\s+(?P<time>[0-9]{2}:[0-9]{2})$")
        .expect("Invalid regex")
});

const WEEKDAY_TOKENS: [(&str, Weekday); 7] = [
    ("MON", Weekday::Mon),
    ("TUE", Weekday::Tue),
    ("WED", Weekday::Wed),
    ("THU", Weekday::Thu),
    ("FRI", Weekday::Fri),
    ("SAT", Weekday::Sat),
    ("SUN", Weekday::Sun),
];

/// Three-letter uppercase token for a weekday, as used in canonical strings.
pub fn weekday_token(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "MON",
        Weekday::Tue => "TUE",
        Weekday::Wed => "WED",
        Weekday::Thu => "THU",
        Weekday::Fri => "FRI",
        Weekday::Sat => "SAT",
        Weekday::Sun => "SUN",
    }
}

/// Inverse of [`weekday_token`]. Accepts any letter case.
pub fn parse_weekday(token: &str) -> Option<Weekday> {
    let upper = token.to_uppercase();
    WEEKDAY_TOKENS
        .iter()
        .find(|(t, _)| *t == upper)
        .map(|(_, day)| *day)
}

/// Parse a raw session string. One-off sessions must lie strictly after `now`.
pub fn parse(raw: &str, now: NaiveDateTime) -> Result<Session, SessionError> {
    parse_inner(raw.trim(), now).inspect_err(|err| {
        debug!(raw, reason = ?err, "rejected session");
    })
}

fn parse_inner(trimmed: &str, now: NaiveDateTime) -> Result<Session, SessionError> {
    if trimmed.is_empty() {
        return Err(SessionError::Format);
    }

    if let Some(caps) = ONE_OFF_PATTERN.captures(trimmed) {
        let date = parse_date(&caps["date"])?;
        let time = parse_hhmm(&caps["time"])?;
        let at = date.and_time(time);
        if at <= now {
            return Err(SessionError::PastDate);
        }
        return Ok(Session::OneOff(at));
    }

    let upper = trimmed.to_uppercase();
    let Some(caps) = RECURRING_PATTERN.captures(&upper) else {
        return Err(SessionError::Format);
    };

    // Time is checked before the day so a bad time wins over a bad day.
    let time = parse_hhmm(&caps["time"])?;
    let rule = &caps["rule"];
    match &caps["kind"] {
        "WEEKLY" => Ok(Session::Weekly {
            day: parse_weekday(rule).ok_or(SessionError::Day)?,
            time,
        }),
        "BIWEEKLY" => Ok(Session::Biweekly {
            day: parse_weekday(rule).ok_or(SessionError::Day)?,
            time,
        }),
        "MONTHLY" => Ok(Session::Monthly {
            day: parse_day_of_month(rule)?,
            time,
        }),
        _ => Err(SessionError::Format),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, SessionError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| SessionError::Format)
}

// Parse a "HH:MM" string into a time of day.
fn parse_hhmm(hhmm: &str) -> Result<NaiveTime, SessionError> {
    let (h, m) = hhmm.split_once(':').ok_or(SessionError::Time)?;
    let h: u32 = h.parse().map_err(|_| SessionError::Time)?;
    let m: u32 = m.parse().map_err(|_| SessionError::Time)?;
    NaiveTime::from_hms_opt(h, m, 0).ok_or(SessionError::Time)
}

fn parse_day_of_month(raw: &str) -> Result<DayOfMonth, SessionError> {
    raw.parse::<u32>()
        .ok()
        .and_then(DayOfMonth::new)
        .ok_or(SessionError::Format)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn one_off_in_future() {
        let s = parse("2025-03-04 07:30", now()).unwrap();
        assert_eq!(s, Session::OneOff(at(2025, 3, 4, 7, 30)));
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let s = parse("   2025-03-04    07:30 \t", now()).unwrap();
        assert_eq!(s, Session::OneOff(at(2025, 3, 4, 7, 30)));
    }

    #[test]
    fn one_off_must_be_strictly_after_now() {
        assert_eq!(parse("2025-01-01 12:00", now()), Err(SessionError::PastDate));
        assert_eq!(parse("2024-12-31 23:59", now()), Err(SessionError::PastDate));
        assert!(parse("2025-01-01 12:01", now()).is_ok());
    }

    #[test]
    fn year_2000_is_always_in_the_past() {
        assert_eq!(parse("2000-01-01 10:00", now()), Err(SessionError::PastDate));
        assert_eq!(
            parse("2000-01-01 10:00", at(2000, 1, 1, 10, 0)),
            Err(SessionError::PastDate)
        );
    }

    #[test]
    fn impossible_calendar_date_is_a_format_error() {
        assert_eq!(parse("2025-02-30 10:00", now()), Err(SessionError::Format));
        assert_eq!(parse("2025-13-01 10:00", now()), Err(SessionError::Format));
    }

    #[test]
    fn bad_time_is_a_time_error() {
        assert_eq!(parse("2025-03-04 24:00", now()), Err(SessionError::Time));
        assert_eq!(parse("2025-03-04 10:60", now()), Err(SessionError::Time));
        assert_eq!(parse("WEEKLY:MON 25:00", now()), Err(SessionError::Time));
        assert_eq!(parse("MONTHLY:15 99:99", now()), Err(SessionError::Time));
    }

    #[test]
    fn time_error_takes_priority_over_day_error() {
        assert_eq!(parse("WEEKLY:XYZ 25:00", now()), Err(SessionError::Time));
    }

    #[test]
    fn recurring_is_case_insensitive() {
        let s = parse("weekly:mon 08:00", now()).unwrap();
        assert_eq!(s, Session::Weekly { day: Weekday::Mon, time: hm(8, 0) });
        let s = parse("BiWeekly:Fri 18:30", now()).unwrap();
        assert_eq!(s, Session::Biweekly { day: Weekday::Fri, time: hm(18, 30) });
    }

    #[test]
    fn bad_weekday_is_a_day_error() {
        assert_eq!(parse("WEEKLY:MONDAY 08:00", now()), Err(SessionError::Day));
        assert_eq!(parse("BIWEEKLY:XYZ 08:00", now()), Err(SessionError::Day));
    }

    #[test]
    fn monthly_day_range() {
        let s = parse("monthly:5 09:00", now()).unwrap();
        assert_eq!(
            s,
            Session::Monthly { day: DayOfMonth::new(5).unwrap(), time: hm(9, 0) }
        );
        assert!(parse("MONTHLY:31 09:00", now()).is_ok());
        assert_eq!(parse("MONTHLY:0 09:00", now()), Err(SessionError::Format));
        assert_eq!(parse("MONTHLY:32 09:00", now()), Err(SessionError::Format));
        assert_eq!(parse("MONTHLY:MON 09:00", now()), Err(SessionError::Format));
    }

    #[test]
    fn unknown_shapes_are_format_errors() {
        for raw in [
            "",
            "   ",
            "DAILY:MON 08:00",
            "WEEKLY MON 08:00",
            "WEEKLY:MON",
            "2025-03-04",
            "2025-3-4 08:00",
            "2025-03-04 8:00",
            "WEEKLY:MON 8:00",
            "tomorrow",
        ] {
            assert_eq!(parse(raw, now()), Err(SessionError::Format), "input {raw:?}");
        }
    }

    #[test]
    fn weekday_tokens_round_trip() {
        for (token, day) in WEEKDAY_TOKENS {
            assert_eq!(weekday_token(day), token);
            assert_eq!(parse_weekday(&token.to_lowercase()), Some(day));
        }
        assert_eq!(parse_weekday("MONDAY"), None);
    }
}
