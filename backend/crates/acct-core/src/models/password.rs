use crate::{CoreError, Result as CoreErrorResult};

use std::panic::Location;

use error_location::ErrorLocation;

/// Plaintext credential on its way to the hasher.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub const MIN_LENGTH: usize = 8;
    pub const MAX_LENGTH: usize = 255;

    #[track_caller]
    pub fn new(value: impl Into<String>) -> CoreErrorResult<Self> {
        let value = value.into();

        if value.chars().count() < Self::MIN_LENGTH {
            return Err(CoreError::Validation {
                field: "password",
                message: format!("password must be at least {} characters", Self::MIN_LENGTH),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if value.len() > Self::MAX_LENGTH {
            return Err(CoreError::Validation {
                field: "password",
                message: format!("password must be at most {} bytes", Self::MAX_LENGTH),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(Self(value))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("value", &"[REDACTED]")
            .finish()
    }
}
