//! Argon2 work, moved off the async workers.

use crate::{Result as ServiceErrorResult, ServiceError};

use acct_auth::{AuthError, hash_password, verify_password};
use acct_core::{ErrorLocation, Password};

use std::panic::Location;

use tokio::task::{JoinError, spawn_blocking};

#[track_caller]
fn join_failed(e: JoinError) -> ServiceError {
    AuthError::Hashing {
        message: e.to_string(),
        location: ErrorLocation::from(Location::caller()),
    }
    .into()
}

/// Hash a credential on the blocking pool. Accounts without one stay `None`.
pub async fn hash_credential(password: Option<Password>) -> ServiceErrorResult<Option<String>> {
    let Some(password) = password else {
        return Ok(None);
    };

    let hash = spawn_blocking(move || hash_password(&password))
        .await
        .map_err(join_failed)??;
    Ok(Some(hash))
}

/// Check a login attempt against a stored hash on the blocking pool.
pub async fn verify_credential(candidate: &str, stored_hash: &str) -> ServiceErrorResult<()> {
    let candidate = candidate.to_owned();
    let stored_hash = stored_hash.to_owned();

    spawn_blocking(move || verify_password(&candidate, &stored_hash))
        .await
        .map_err(join_failed)??;
    Ok(())
}
