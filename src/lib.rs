//! Scheduling core for a personal-trainer client tracker.
//!
//! [`Session`] models a training slot (one-off, weekly, biweekly, monthly),
//! [`Deadline`] a payment deadline with a one-year policy window, and
//! [`ordering`] the two roster sort orders. Everything time-dependent takes a
//! [`Clock`] explicitly.
//!
//! The crate also exposes a small stateless JSON API over these types.

pub mod clock; // Injectable "now"
pub mod deadline; // Payment deadline value type
pub mod error; // Rejection reasons
pub mod logic; // Roster-level queries
pub mod models; // Client record and wire shapes
pub mod ordering; // Deadline / next-session comparators
pub mod recurrence; // Session grammar parser
pub mod routes_roster; // HTTP handlers for roster sorting, dashboard, deadlines
pub mod routes_sessions; // HTTP handlers for session parsing and conflicts
pub mod session; // Session value type

use std::sync::Arc;

use axum::{routing::post, Router};
use tower_http::trace::TraceLayer;

pub use clock::{Clock, FixedClock, SystemClock};
pub use deadline::Deadline;
pub use error::{ApiError, DeadlineError, SessionError};
pub use session::{DayOfMonth, Session, SessionKind};

/// Shared handler state. Only the clock; there is no storage.
#[derive(Clone)]
pub struct AppState {
    clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(clock: impl Clock + 'static) -> Self {
        Self {
            clock: Arc::new(clock),
        }
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("now", &self.clock.now())
            .finish()
    }
}

pub fn app(state: AppState) -> Router {
    let api = Router::new()
        // sessions
        .route("/sessions/parse", post(routes_sessions::parse_session))
        .route("/sessions/conflicts", post(routes_sessions::check_conflicts))
        // deadlines
        .route("/deadlines/validate", post(routes_roster::validate_deadline))
        // roster
        .route("/roster/sort", post(routes_roster::sort_roster))
        .route("/roster/dashboard", post(routes_roster::dashboard));

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
