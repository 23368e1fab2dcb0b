use serde::{Deserialize, Serialize};

use crate::deadline::Deadline;
use crate::error::ApiError;
use crate::ordering::Scheduled;
use crate::session::Session;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientRecord {
    pub name: String,
    pub session: Session,
    pub deadline: Deadline,
    pub paid: bool,
}

impl Scheduled for ClientRecord {
    fn session(&self) -> &Session {
        &self.session
    }

    fn deadline(&self) -> &Deadline {
        &self.deadline
    }
}

// Client as it arrives over the wire: raw strings, as persisted.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientInput {
    pub name: String,
    pub session: String,
    #[serde(default)]
    pub deadline: String,
    #[serde(default)]
    pub paid: bool,
}

impl ClientInput {
    /// Rebuild a stored record. Past one-offs and expired deadlines still load.
    pub fn into_record(self) -> Result<ClientRecord, ApiError> {
        let session =
            Session::restore(&self.session).map_err(|e| ApiError::for_client(&self.name, e))?;
        let deadline =
            Deadline::restore(&self.deadline).map_err(|e| ApiError::for_client(&self.name, e))?;
        Ok(ClientRecord {
            name: self.name,
            session,
            deadline,
            paid: self.paid,
        })
    }
}

pub fn into_records(clients: Vec<ClientInput>) -> Result<Vec<ClientRecord>, ApiError> {
    clients.into_iter().map(ClientInput::into_record).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_defaults_and_restore() {
        let input: ClientInput =
            serde_json::from_str(r#"{ "name": "Sam", "session": "weekly:tue 07:00" }"#).unwrap();
        let record = input.into_record().unwrap();
        assert_eq!(record.session.canonical_string(), "WEEKLY:TUE 07:00");
        assert!(record.deadline.is_empty());
        assert!(!record.paid);
    }

    #[test]
    fn record_serializes_canonical_strings() {
        let input = ClientInput {
            name: "Kim".into(),
            session: "monthly:2 18:00".into(),
            deadline: "2025-04-01".into(),
            paid: true,
        };
        let json = serde_json::to_value(input.into_record().unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "Kim",
                "session": "MONTHLY:02 18:00",
                "deadline": "2025-04-01",
                "paid": true,
            })
        );
    }

    #[test]
    fn bad_input_names_the_client() {
        let input = ClientInput {
            name: "Jo".into(),
            session: "WEEKLY:FUNDAY 10:00".into(),
            deadline: String::new(),
            paid: false,
        };
        let err = input.into_record().unwrap_err();
        assert!(err.to_string().starts_with("client \"Jo\""));
    }
}
