use acct_core::CoreError;
use acct_service::{IsRetryable, ServiceError};

use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EventError {
    #[error("Kafka error: {source} {location}")]
    Kafka {
        #[source]
        source: kafka::Error,
        location: ErrorLocation,
    },

    #[error("Malformed event payload: {source} {location}")]
    Decode {
        #[source]
        source: serde_json::Error,
        location: ErrorLocation,
    },

    #[error("Invalid event: {source}")]
    Invalid {
        #[source]
        source: CoreError,
    },

    #[error("Event handler failed: {source}")]
    Handler {
        #[source]
        source: ServiceError,
    },

    #[error("Blocking consumer task failed: {message} {location}")]
    Join {
        message: String,
        location: ErrorLocation,
    },

    #[error("Consumer session is no longer usable {location}")]
    Disconnected { location: ErrorLocation },

    #[error("Consumer cancelled {location}")]
    Cancelled { location: ErrorLocation },
}

impl EventError {
    #[track_caller]
    pub fn cancelled() -> Self {
        Self::Cancelled {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn disconnected() -> Self {
        Self::Disconnected {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

impl From<kafka::Error> for EventError {
    #[track_caller]
    fn from(source: kafka::Error) -> Self {
        Self::Kafka {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<serde_json::Error> for EventError {
    #[track_caller]
    fn from(source: serde_json::Error) -> Self {
        Self::Decode {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<CoreError> for EventError {
    fn from(source: CoreError) -> Self {
        Self::Invalid { source }
    }
}

impl From<ServiceError> for EventError {
    fn from(source: ServiceError) -> Self {
        Self::Handler { source }
    }
}

impl From<tokio::task::JoinError> for EventError {
    #[track_caller]
    fn from(e: tokio::task::JoinError) -> Self {
        Self::Join {
            message: e.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl IsRetryable for EventError {
    /// Broker connectivity is worth retrying; everything else is final.
    fn is_retryable(&self) -> bool {
        matches!(self, Self::Kafka { .. } | Self::Disconnected { .. })
    }
}

pub type Result<T> = std::result::Result<T, EventError>;
