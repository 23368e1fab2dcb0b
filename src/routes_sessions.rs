// --------------------------------------------------
// Handles API endpoints for session slots.
//
// Responsibilities:
// - Parse / normalize a raw session string
// - Check a candidate slot against a roster
// -------------------------------------------------

use axum::{extract::State, Json};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ApiError;
use crate::logic;
use crate::models::{self, ClientInput};
use crate::session::{Session, SessionKind};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ParseInput {
    pub session: String,
}

#[derive(Debug, Serialize)]
pub struct ParsedSession {
    pub canonical: String,
    pub kind: SessionKind,
    pub next_occurrence: Option<NaiveDateTime>,
}

// -----------------------------
// POST /api/sessions/parse
// Validates a session and returns its canonical form
// -----------------------------
pub async fn parse_session(
    State(state): State<AppState>,
    Json(input): Json<ParseInput>,
) -> Result<Json<ParsedSession>, ApiError> {
    let clock = state.clock();
    let session = Session::parse(&input.session, clock)?;

    Ok(Json(ParsedSession {
        canonical: session.canonical_string(),
        kind: session.kind(),
        next_occurrence: session.next_occurrence(clock),
    }))
}

#[derive(Debug, Deserialize)]
pub struct ConflictQuery {
    pub candidate: String,
    pub clients: Vec<ClientInput>,
    pub skip: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ConflictResponse {
    pub conflict: bool,
    pub with: Option<String>,
}

// -----------------------------
// POST /api/sessions/conflicts
// Reports the first client whose slot collides with the candidate
// -----------------------------
pub async fn check_conflicts(
    State(state): State<AppState>,
    Json(query): Json<ConflictQuery>,
) -> Result<Json<ConflictResponse>, ApiError> {
    let clock = state.clock();
    let candidate = Session::parse(&query.candidate, clock)?;
    let roster = models::into_records(query.clients)?;

    let hit = logic::find_conflict(&candidate, &roster, query.skip.as_deref(), clock);
    if let Some(record) = hit {
        info!(candidate = %candidate, client = %record.name, "candidate slot is taken");
    }

    Ok(Json(ConflictResponse {
        conflict: hit.is_some(),
        with: hit.map(|r| r.name.clone()),
    }))
}
