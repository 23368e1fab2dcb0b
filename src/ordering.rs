//! Sort orders for client records.
//!
//! Both comparators push records that lack the sort value (no deadline, no
//! upcoming session) to the end, whatever the direction.

use std::cmp::Ordering;

use chrono::NaiveDateTime;

use crate::clock::Clock;
use crate::deadline::Deadline;
use crate::session::Session;

/// Anything carrying a session and a deadline.
pub trait Scheduled {
    fn session(&self) -> &Session;
    fn deadline(&self) -> &Deadline;
}

// Present values first; `cmp` only orders two present values.
fn present_first<T>(a: Option<T>, b: Option<T>, cmp: impl FnOnce(T, T) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => cmp(a, b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Order by deadline date. Direction flips present dates only.
pub fn by_deadline<T: Scheduled>(ascending: bool) -> impl Fn(&T, &T) -> Ordering {
    move |a, b| {
        present_first(a.deadline().as_date(), b.deadline().as_date(), |da, db| {
            if ascending { da.cmp(&db) } else { db.cmp(&da) }
        })
    }
}

/// Order by the soonest upcoming session, as seen from `clock`.
pub fn by_next_session<T: Scheduled>(clock: &dyn Clock) -> impl Fn(&T, &T) -> Ordering + '_ {
    move |a, b| {
        let na: Option<NaiveDateTime> = a.session().next_occurrence(clock);
        let nb = b.session().next_occurrence(clock);
        present_first(na, nb, |x, y| x.cmp(&y))
    }
}
