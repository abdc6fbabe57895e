use crate::Result as EventErrorResult;

use acct_core::{NewUser, Password, Role, validate_email};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// JSON payload published for each account to be created.
///
/// `id` and the timestamps are assigned by the store and ignored on ingest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCreatedEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl UserCreatedEvent {
    pub fn decode(payload: &[u8]) -> EventErrorResult<Self> {
        Ok(serde_json::from_slice(payload)?)
    }

    /// Validate the payload and turn it into a create request.
    pub fn into_new_user(self) -> EventErrorResult<NewUser> {
        validate_email(&self.email)?;
        let role = Role::from_stored(self.role.as_deref())?;

        let mut user = NewUser::new(self.name, self.email, role);
        if let Some(password) = self.password {
            user = user.with_password(Password::new(password)?);
        }
        Ok(user)
    }
}
