use acct_core::{CoreError, ErrorLocation};

use std::panic::Location;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLx error: {source} {location}")]
    Sqlx {
        source: sqlx::Error,
        location: ErrorLocation,
    },

    #[error("Migration error: {message} {location}")]
    Migration {
        message: String,
        location: ErrorLocation,
    },

    #[error("{entity} with {identifier} not found {location}")]
    NotFound {
        entity: &'static str,
        identifier: String,
        location: ErrorLocation,
    },

    #[error("{field} already exists {location}")]
    AlreadyExists {
        field: &'static str,
        location: ErrorLocation,
    },

    #[error("Invalid input on '{field}': {message} {location}")]
    InvalidInput {
        field: &'static str,
        message: String,
        location: ErrorLocation,
    },

    #[error("{source}")]
    Core {
        #[source]
        source: CoreError,
    },
}

impl DbError {
    #[track_caller]
    pub fn not_found(entity: &'static str, identifier: impl std::fmt::Display) -> Self {
        Self::NotFound {
            entity,
            identifier: identifier.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

/// Map a unique constraint name onto the user-facing field it guards.
pub fn unique_field(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some(name) if name.contains("email") => "email",
        Some(name) if name.contains("name") => "name",
        _ => "record",
    }
}

impl From<sqlx::Error> for DbError {
    #[track_caller]
    fn from(source: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &source
            && db_err.is_unique_violation()
        {
            return Self::AlreadyExists {
                field: unique_field(db_err.constraint()),
                location: ErrorLocation::from(Location::caller()),
            };
        }

        Self::Sqlx {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    #[track_caller]
    fn from(e: sqlx::migrate::MigrateError) -> Self {
        Self::Migration {
            message: e.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<CoreError> for DbError {
    fn from(source: CoreError) -> Self {
        Self::Core { source }
    }
}

pub type Result<T> = std::result::Result<T, DbError>;
