use crate::{CoreError, Result as CoreErrorResult};

use std::panic::Location;
use std::str::FromStr;

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    #[default]
    Unknown,
    User,
    Admin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Unknown, Role::User, Role::Admin];

    /// Persisted string form
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::User => "USER",
            Self::Admin => "ADMIN",
        }
    }

    /// Decode a stored column or cache field. Absent and empty values are `Unknown`.
    #[track_caller]
    pub fn from_stored(value: Option<&str>) -> CoreErrorResult<Self> {
        match value {
            None => Ok(Self::Unknown),
            Some(s) if s.is_empty() => Ok(Self::Unknown),
            Some(s) => s.parse(),
        }
    }
}

impl FromStr for Role {
    type Err = CoreError;

    #[track_caller]
    fn from_str(s: &str) -> CoreErrorResult<Self> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| CoreError::InvalidRole {
                value: s.to_string(),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
