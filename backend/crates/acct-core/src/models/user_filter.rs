use crate::{CoreError, Result as CoreErrorResult};

use std::panic::Location;

use error_location::ErrorLocation;

/// Lookup by exactly one of the two unique keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    pub id: Option<i64>,
    pub name: Option<String>,
}

/// A resolved, single-key lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserKey<'a> {
    Id(i64),
    Name(&'a str),
}

impl UserFilter {
    pub fn by_id(id: i64) -> Self {
        Self {
            id: Some(id),
            name: None,
        }
    }

    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
        }
    }

    #[track_caller]
    pub fn key(&self) -> CoreErrorResult<UserKey<'_>> {
        match (self.id, self.name.as_deref()) {
            (Some(id), None) => Ok(UserKey::Id(id)),
            (None, Some(name)) => Ok(UserKey::Name(name)),
            (Some(_), Some(_)) => Err(CoreError::InvalidFilter {
                message: "only one of id or name may be set".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
            (None, None) => Err(CoreError::InvalidFilter {
                message: "one of id or name must be set".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}

impl std::fmt::Display for UserKey<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(id) => write!(f, "ID {id}"),
            Self::Name(name) => write!(f, "name '{name}'"),
        }
    }
}
