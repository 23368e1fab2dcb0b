/*
Roster-level queries over client records.
Kept apart from HTTP / Axum so they can be tested directly.
*/

use crate::clock::Clock;
use crate::models::ClientRecord;
use crate::ordering::{by_deadline, by_next_session};
use crate::session::Session;

// How a roster listing is ordered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Deadline { ascending: bool },
    NextSession,
}

// First record whose session collides with `candidate`.
//
// Rules:
// - The record named `skip` is ignored (it is the one being edited)
// - Only the collision is reported; callers decide whether to refuse it
pub fn find_conflict<'a>(
    candidate: &Session,
    roster: &'a [ClientRecord],
    skip: Option<&str>,
    clock: &dyn Clock,
) -> Option<&'a ClientRecord> {
    roster
        .iter()
        .filter(|r| skip != Some(r.name.as_str()))
        .find(|r| candidate.conflicts_with(&r.session, clock))
}

// Stable sort, so ties keep their incoming order.
pub fn sort_roster(records: &mut [ClientRecord], key: SortKey, clock: &dyn Clock) {
    match key {
        SortKey::Deadline { ascending } => records.sort_by(by_deadline(ascending)),
        SortKey::NextSession => records.sort_by(by_next_session(clock)),
    }
}

// Dashboard view: unpaid clients only, soonest deadline first,
// clients without a deadline at the bottom.
pub fn unpaid_by_deadline(records: &[ClientRecord]) -> Vec<ClientRecord> {
    let mut unpaid: Vec<ClientRecord> = records.iter().filter(|r| !r.paid).cloned().collect();
    unpaid.sort_by(by_deadline(true));
    unpaid
}
