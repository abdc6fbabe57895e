use acct_core::ErrorLocation;

use std::panic::Location;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Redis error: {source} {location}")]
    Redis {
        source: redis::RedisError,
        location: ErrorLocation,
    },

    #[error("Cache entry for user {id} not found {location}")]
    NotFound { id: i64, location: ErrorLocation },

    #[error("Cache field '{field}' is invalid: {message} {location}")]
    Decode {
        field: &'static str,
        message: String,
        location: ErrorLocation,
    },

    #[error("Cache field '{field}' cannot be encoded: {message} {location}")]
    Encode {
        field: &'static str,
        message: String,
        location: ErrorLocation,
    },

    #[error("Cache {operation} timed out {location}")]
    Timeout {
        operation: &'static str,
        location: ErrorLocation,
    },
}

impl CacheError {
    #[track_caller]
    pub fn decode(field: &'static str, message: impl Into<String>) -> Self {
        Self::Decode {
            field,
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<redis::RedisError> for CacheError {
    #[track_caller]
    fn from(source: redis::RedisError) -> Self {
        Self::Redis {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, CacheError>;
