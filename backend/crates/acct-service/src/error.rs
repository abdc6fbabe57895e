use acct_auth::AuthError;
use acct_cache::CacheError;
use acct_core::{CoreError, ErrorLocation, Role};
use acct_db::DbError;

use std::fmt;
use std::panic::Location;

use thiserror::Error;

/// Cache step that ran after the store of record had already committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOperation {
    Create,
    Update,
    Delete,
    Repopulate,
}

impl CacheOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Repopulate => "repopulate",
        }
    }
}

impl fmt::Display for CacheOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("{entity} with {identifier} not found {location}")]
    NotFound {
        entity: &'static str,
        identifier: String,
        location: ErrorLocation,
    },

    #[error("Invalid input on '{field}': {message} {location}")]
    InvalidInput {
        field: &'static str,
        message: String,
        location: ErrorLocation,
    },

    #[error("{field} already exists {location}")]
    AlreadyExists {
        field: &'static str,
        location: ErrorLocation,
    },

    #[error("Invalid credentials {location}")]
    InvalidCredential { location: ErrorLocation },

    #[error("Authentication failed: {source}")]
    Unauthenticated {
        #[source]
        source: AuthError,
    },

    #[error("Role {role} may not call '{endpoint}' {location}")]
    Forbidden {
        endpoint: String,
        role: Role,
        location: ErrorLocation,
    },

    #[error("Cache {operation} for user {id} failed after commit: {source} {location}")]
    CacheDesync {
        id: i64,
        operation: CacheOperation,
        #[source]
        source: CacheError,
        location: ErrorLocation,
    },

    #[error("{source}")]
    Store {
        #[source]
        source: DbError,
    },

    #[error("{source}")]
    Cache {
        #[source]
        source: CacheError,
    },

    #[error("{source}")]
    Auth {
        #[source]
        source: AuthError,
    },
}

impl ServiceError {
    #[track_caller]
    pub fn invalid_input(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn invalid_credential() -> Self {
        Self::InvalidCredential {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn cache_desync(id: i64, operation: CacheOperation, source: CacheError) -> Self {
        Self::CacheDesync {
            id,
            operation,
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    pub fn is_desync(&self) -> bool {
        matches!(self, Self::CacheDesync { .. })
    }
}

impl From<CoreError> for ServiceError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::Validation {
                field,
                message,
                location,
            } => Self::InvalidInput {
                field,
                message,
                location,
            },
            CoreError::InvalidRole { value, location } => Self::InvalidInput {
                field: "role",
                message: format!("unknown role '{value}'"),
                location,
            },
            CoreError::InvalidFilter { message, location } => Self::InvalidInput {
                field: "filter",
                message,
                location,
            },
        }
    }
}

impl From<AuthError> for ServiceError {
    fn from(source: AuthError) -> Self {
        match source {
            AuthError::InvalidCredential { location } => Self::InvalidCredential { location },
            source if source.is_unauthenticated() => Self::Unauthenticated { source },
            source => Self::Auth { source },
        }
    }
}

impl From<DbError> for ServiceError {
    fn from(source: DbError) -> Self {
        match source {
            DbError::NotFound {
                entity,
                identifier,
                location,
            } => Self::NotFound {
                entity,
                identifier,
                location,
            },
            DbError::AlreadyExists { field, location } => Self::AlreadyExists { field, location },
            DbError::InvalidInput {
                field,
                message,
                location,
            } => Self::InvalidInput {
                field,
                message,
                location,
            },
            DbError::Core { source } => source.into(),
            source => Self::Store { source },
        }
    }
}

impl From<CacheError> for ServiceError {
    fn from(source: CacheError) -> Self {
        Self::Cache { source }
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
