use crate::{AuthError, Result as AuthErrorResult};

use acct_core::Password;

use std::panic::Location;

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use error_location::ErrorLocation;

/// Hash a credential into a PHC string (argon2id, random salt).
#[track_caller]
pub fn hash_password(password: &Password) -> AuthErrorResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_str().as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hashing {
            message: e.to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
}

/// Verify a candidate against a stored PHC string.
#[track_caller]
pub fn verify_password(candidate: &str, stored_hash: &str) -> AuthErrorResult<()> {
    let parsed = PasswordHash::new(stored_hash).map_err(|_| AuthError::InvalidCredential {
        location: ErrorLocation::from(Location::caller()),
    })?;

    Argon2::default()
        .verify_password(candidate.as_bytes(), &parsed)
        .map_err(|_| AuthError::InvalidCredential {
            location: ErrorLocation::from(Location::caller()),
        })
}
