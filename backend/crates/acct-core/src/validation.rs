//! Request field checks applied at the RPC boundary before any store access.

use crate::{CoreError, Password, Result as CoreErrorResult};

use std::panic::Location;
use std::sync::LazyLock;

use error_location::ErrorLocation;
use regex::Regex;

pub(crate) const EMAIL_PATTERN: &str = r"^[\w\-.]+@([\w-]+\.)+[\w-]{2,4}$";

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("EMAIL_PATTERN is a valid regex"));

#[track_caller]
pub fn validate_email(email: &str) -> CoreErrorResult<()> {
    if EMAIL_RE.is_match(email) {
        Ok(())
    } else {
        Err(CoreError::Validation {
            field: "email",
            message: format!("'{email}' is not a valid email address"),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}

/// Checks length and confirmation, returning the wrapped credential.
#[track_caller]
pub fn validate_password(password: &str, confirm: &str) -> CoreErrorResult<Password> {
    if password != confirm {
        return Err(CoreError::Validation {
            field: "password_confirm",
            message: "password and confirmation do not match".to_string(),
            location: ErrorLocation::from(Location::caller()),
        });
    }

    Password::new(password)
}
