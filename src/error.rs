//! Rejection reasons for session and deadline input.
//!
//! Every variant is an ordinary outcome of bad input. Messages are meant to be
//! shown to the user as-is.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Why a raw session string was refused.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    #[error("Error: Session format must be either: YYYY-MM-DD HH:MM OR [WEEKLY|BIWEEKLY|MONTHLY]:[DAY] HH:MM")]
    Format,

    #[error("Error: Invalid time. Use 24-hour format (00:00–23:59).")]
    Time,

    #[error("Error: Invalid day. Use MON, TUE, etc.")]
    Day,

    #[error("Error: Session date cannot be in the past.")]
    PastDate,
}

/// Why a raw deadline string was refused.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeadlineError {
    #[error("Deadlines should be in the format yyyy-MM-dd, or left empty to clear")]
    Format,

    #[error("Deadline must be after today and at most one year from today")]
    Window,
}

/// Errors surfaced by the HTTP handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Session(#[from] SessionError),

    #[error("{0}")]
    Deadline(#[from] DeadlineError),

    #[error("client {client:?}: {source}")]
    Client {
        client: String,
        #[source]
        source: Box<ApiError>,
    },

    #[error("invalid query: {0}")]
    Query(String),
}

impl ApiError {
    pub fn for_client(client: &str, source: impl Into<ApiError>) -> Self {
        ApiError::Client {
            client: client.to_string(),
            source: Box::new(source.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.to_string() });
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_name_the_client() {
        let err = ApiError::for_client("Alex", SessionError::Day);
        assert_eq!(
            err.to_string(),
            "client \"Alex\": Error: Invalid day. Use MON, TUE, etc."
        );
    }

    #[test]
    fn rejections_map_to_bad_request() {
        let resp = ApiError::from(DeadlineError::Window).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
