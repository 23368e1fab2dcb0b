// --------------------------------------------------
// Handles API endpoints over a whole client roster
// and single deadline checks.
//
// The roster is sent with each request; nothing is stored.
// -------------------------------------------------

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::deadline::Deadline;
use crate::error::ApiError;
use crate::logic::{self, SortKey};
use crate::models::{self, ClientInput, ClientRecord};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct DeadlineInput {
    pub deadline: String,
}

#[derive(Debug, Serialize)]
pub struct DeadlineResponse {
    pub valid: bool,
    pub deadline: String,
    pub error: Option<String>,
}

// -----------------------------
// POST /api/deadlines/validate
// Checks a deadline against today's window
// -----------------------------
pub async fn validate_deadline(
    State(state): State<AppState>,
    Json(input): Json<DeadlineInput>,
) -> Json<DeadlineResponse> {
    let resp = match Deadline::from_str_at(&input.deadline, state.clock()) {
        Ok(d) => DeadlineResponse {
            valid: true,
            deadline: d.to_storage_string(),
            error: None,
        },
        Err(e) => DeadlineResponse {
            valid: false,
            deadline: input.deadline.trim().to_string(),
            error: Some(e.to_string()),
        },
    };
    Json(resp)
}

#[derive(Debug, Deserialize)]
pub struct SortQuery {
    pub by: String,            // "deadline" / "session"
    pub order: Option<String>, // "asc" / "desc", defaults to "asc"
}

impl SortQuery {
    fn key(&self) -> Result<SortKey, ApiError> {
        let ascending = match self.order.as_deref().unwrap_or("asc") {
            "asc" => true,
            "desc" => false,
            other => return Err(ApiError::Query(format!("unknown order {other:?}"))),
        };
        match (self.by.as_str(), ascending) {
            ("deadline", _) => Ok(SortKey::Deadline { ascending }),
            ("session", true) => Ok(SortKey::NextSession),
            ("session", false) => Err(ApiError::Query(
                "sessions can only be sorted soonest first".to_string(),
            )),
            (other, _) => Err(ApiError::Query(format!("unknown sort key {other:?}"))),
        }
    }
}

// -----------------------------
// POST /api/roster/sort?by=deadline&order=desc
// Returns the roster in the requested order
// -----------------------------
pub async fn sort_roster(
    State(state): State<AppState>,
    Query(q): Query<SortQuery>,
    Json(clients): Json<Vec<ClientInput>>,
) -> Result<Json<Vec<ClientRecord>>, ApiError> {
    let key = q.key()?;
    let mut records = models::into_records(clients)?;
    logic::sort_roster(&mut records, key, state.clock());
    Ok(Json(records))
}

// -----------------------------
// POST /api/roster/dashboard
// Unpaid clients, most pressing deadline first
// -----------------------------
pub async fn dashboard(
    Json(clients): Json<Vec<ClientInput>>,
) -> Result<Json<Vec<ClientRecord>>, ApiError> {
    let records = models::into_records(clients)?;
    Ok(Json(logic::unpaid_by_deadline(&records)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(by: &str, order: Option<&str>) -> SortQuery {
        SortQuery {
            by: by.to_string(),
            order: order.map(str::to_string),
        }
    }

    #[test]
    fn sort_keys() {
        assert_eq!(
            query("deadline", None).key().unwrap(),
            SortKey::Deadline { ascending: true }
        );
        assert_eq!(
            query("deadline", Some("desc")).key().unwrap(),
            SortKey::Deadline { ascending: false }
        );
        assert_eq!(query("session", Some("asc")).key().unwrap(), SortKey::NextSession);
        assert!(query("session", Some("desc")).key().is_err());
        assert!(query("paid", None).key().is_err());
        assert!(query("deadline", Some("sideways")).key().is_err());
    }
}
