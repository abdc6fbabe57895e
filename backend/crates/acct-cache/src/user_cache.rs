use crate::Result as CacheErrorResult;

use acct_core::{User, UserPatch};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Advisory mirror of the store of record, one field-map per user keyed by the decimal ID.
#[async_trait]
pub trait UserCache: Send + Sync + 'static {
    /// Write every field of `user`.
    async fn create(&self, user: &User) -> CacheErrorResult<()>;

    /// Full read. A key with no fields is `NotFound`.
    async fn get(&self, id: i64) -> CacheErrorResult<User>;

    /// Overwrite only the fields carried by `patch` plus `updated_at`.
    /// Returns `false` when there was no entry to update.
    async fn update(&self, patch: &UserPatch, updated_at: DateTime<Utc>) -> CacheErrorResult<bool>;

    async fn delete(&self, id: i64) -> CacheErrorResult<()>;

    /// Page of cached users in ascending numeric ID order.
    async fn list(&self, limit: usize, offset: usize) -> CacheErrorResult<Vec<User>>;
}
