use crate::Result as DbErrorResult;

use acct_core::{NewUser, Role, User, UserFilter, UserPatch};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// A user together with its stored password hash, for credential checks only.
#[derive(Clone)]
pub struct Credential {
    pub user: User,
    pub password_hash: Option<String>,
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("user", &self.user)
            .field("password_hash", &"[REDACTED]")
            .finish()
    }
}

/// Store of record for accounts.
///
/// Mutations take the caller's transaction so they commit or roll back together
/// with the audit record; reads go straight to the pool.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    type Tx: Send + 'static;

    /// Insert with an already-hashed credential. Returns the stored row with its generated ID.
    async fn create(
        &self,
        tx: &mut Self::Tx,
        user: &NewUser,
        password_hash: Option<&str>,
    ) -> DbErrorResult<User>;

    /// Apply a partial update, returning the new `updated_at`. Zero rows is `NotFound`.
    async fn update(&self, tx: &mut Self::Tx, patch: &UserPatch)
    -> DbErrorResult<DateTime<Utc>>;

    /// Remove a row. Zero rows is `NotFound`.
    async fn delete(&self, tx: &mut Self::Tx, id: i64) -> DbErrorResult<()>;

    async fn get(&self, filter: &UserFilter) -> DbErrorResult<User>;

    async fn find_credential(&self, name: &str) -> DbErrorResult<Credential>;

    /// Page ordered by ID ascending.
    async fn list(&self, limit: i64, offset: i64) -> DbErrorResult<Vec<User>>;

    /// One round trip; `NotFound` names the first missing ID in request order.
    async fn check_users_exist(&self, ids: &[i64]) -> DbErrorResult<()>;

    /// Roles allowed to call `endpoint`.
    async fn endpoint_roles(&self, endpoint: &str) -> DbErrorResult<Vec<Role>>;
}
