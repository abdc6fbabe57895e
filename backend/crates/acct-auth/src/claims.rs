use crate::{AuthError, Result as AuthErrorResult};

use acct_core::Role;

use std::panic::Location;

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};

/// Distinguishes long-lived refresh tokens from short-lived access tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT claims issued by this service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (account name)
    pub sub: String,
    pub role: Role,
    pub kind: TokenKind,
    /// Expiration timestamp (Unix)
    pub exp: i64,
    /// Issued at timestamp (Unix)
    pub iat: i64,
}

impl Claims {
    /// Validate claims after JWT signature verification
    #[track_caller]
    pub fn validate(&self, expected: TokenKind) -> AuthErrorResult<()> {
        if self.sub.is_empty() {
            return Err(AuthError::InvalidClaim {
                claim: "sub".to_string(),
                message: "sub cannot be empty".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if self.kind != expected {
            return Err(AuthError::InvalidToken {
                message: format!("expected {expected:?} token, got {:?}", self.kind),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(())
    }
}
