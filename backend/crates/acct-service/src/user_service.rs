use crate::{
    Backend, CacheOperation, Metrics, Outcome, Paging, Result as ServiceErrorResult, ServiceError,
    hash_credential,
};

use acct_cache::UserCache;
use acct_core::{NewUser, User, UserFilter, UserPatch};
use acct_db::{AuditLog, DbError, TxManager, UserStore};

use std::sync::Arc;

use log::{debug, info, warn};

/// Keeps the store of record, the audit log and the cache coherent.
///
/// Mutations commit store and audit writes in one read-committed transaction
/// and only then touch the cache. Reads prefer the cache.
pub struct UserService<B: Backend> {
    store: Arc<B::Store>,
    audit: Arc<B::Audit>,
    tx_manager: Arc<B::TxManager>,
    cache: Arc<B::Cache>,
    paging: Paging,
    metrics: Metrics,
}

impl<B: Backend> Clone for UserService<B> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            audit: Arc::clone(&self.audit),
            tx_manager: Arc::clone(&self.tx_manager),
            cache: Arc::clone(&self.cache),
            paging: self.paging,
            metrics: self.metrics.clone(),
        }
    }
}

impl<B: Backend> UserService<B> {
    pub fn new(
        store: Arc<B::Store>,
        audit: Arc<B::Audit>,
        tx_manager: Arc<B::TxManager>,
        cache: Arc<B::Cache>,
    ) -> Self {
        Self {
            store,
            audit,
            tx_manager,
            cache,
            paging: Paging::default(),
            metrics: Metrics::new(),
        }
    }

    pub fn with_paging(mut self, paging: Paging) -> Self {
        self.paging = paging;
        self
    }

    pub fn store(&self) -> &Arc<B::Store> {
        &self.store
    }

    fn desynced<T>(
        &self,
        value: T,
        id: i64,
        operation: CacheOperation,
        source: acct_cache::CacheError,
    ) -> Outcome<T> {
        warn!("Cache {operation} for user {id} failed, cache is now stale: {source}");
        self.metrics.cache_desync(operation);
        Outcome::desynced(value, ServiceError::cache_desync(id, operation, source))
    }

    /// Insert and audit in one transaction, then mirror into the cache.
    /// Returns the generated ID even when the cache write fails.
    ///
    /// The credential is hashed before the transaction opens.
    pub async fn create(&self, user: NewUser) -> ServiceErrorResult<Outcome<i64>> {
        let password_hash = hash_credential(user.password.clone()).await?;
        let store = Arc::clone(&self.store);
        let audit = Arc::clone(&self.audit);

        let created = self
            .tx_manager
            .read_committed(move |mut tx| async move {
                let created = store
                    .create(&mut tx, &user, password_hash.as_deref())
                    .await?;
                audit
                    .append(
                        &mut tx,
                        Some(created.id),
                        &format!("user created with ID {}", created.id),
                    )
                    .await?;
                Ok((created, tx))
            })
            .await?;

        info!("Created user {}", created.id);

        Ok(match self.cache.create(&created).await {
            Ok(()) => Outcome::clean(created.id),
            Err(source) => self.desynced(created.id, created.id, CacheOperation::Create, source),
        })
    }

    /// Cache first; on a miss or cache failure read the store and repopulate.
    pub async fn get(&self, id: i64) -> ServiceErrorResult<Outcome<User>> {
        match self.cache.get(id).await {
            Ok(user) => {
                self.metrics.cache_hit();
                return Ok(Outcome::clean(user));
            }
            Err(e) if e.is_not_found() => debug!("Cache miss for user {id}"),
            Err(e) => warn!("Cache read for user {id} failed, falling back to store: {e}"),
        }
        self.metrics.cache_miss();

        let user = self.store.get(&UserFilter::by_id(id)).await?;

        Ok(match self.cache.create(&user).await {
            Ok(()) => Outcome::clean(user),
            Err(source) => self.desynced(user, id, CacheOperation::Repopulate, source),
        })
    }

    /// Apply only the fields present in `patch`; `updated_at` always advances.
    pub async fn update(&self, patch: UserPatch) -> ServiceErrorResult<Outcome<()>> {
        let id = patch.id;
        let store = Arc::clone(&self.store);
        let audit = Arc::clone(&self.audit);
        let staged = patch.clone();

        let updated_at = self
            .tx_manager
            .read_committed(move |mut tx| async move {
                let updated_at = store.update(&mut tx, &staged).await?;
                audit
                    .append(&mut tx, Some(staged.id), &format!("user {} updated", staged.id))
                    .await?;
                Ok((updated_at, tx))
            })
            .await?;

        info!("Updated user {id} ({})", patch.changed_fields().join(", "));

        Ok(match self.cache.update(&patch, updated_at).await {
            Ok(_) => Outcome::clean(()),
            Err(source) => self.desynced((), id, CacheOperation::Update, source),
        })
    }

    /// Delete and audit in one transaction, then evict. A missing row still
    /// evicts so a stale cache entry cannot outlive it.
    pub async fn delete(&self, id: i64) -> ServiceErrorResult<Outcome<()>> {
        let store = Arc::clone(&self.store);
        let audit = Arc::clone(&self.audit);

        let deleted = self
            .tx_manager
            .read_committed(move |mut tx| async move {
                store.delete(&mut tx, id).await?;
                audit
                    .append(&mut tx, None, &format!("user {id} deleted"))
                    .await?;
                Ok(((), tx))
            })
            .await;

        match deleted {
            Ok(()) => {
                info!("Deleted user {id}");
                Ok(match self.cache.delete(id).await {
                    Ok(()) => Outcome::clean(()),
                    Err(source) => self.desynced((), id, CacheOperation::Delete, source),
                })
            }
            Err(e @ DbError::NotFound { .. }) => {
                if let Err(purge) = self.cache.delete(id).await {
                    warn!("Could not purge cache entry for missing user {id}: {purge}");
                }
                Err(e.into())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Always served by the store of record, ordered by ID.
    pub async fn list(&self, limit: i64, offset: i64) -> ServiceErrorResult<Vec<User>> {
        let (limit, offset) = self.paging.normalize(limit, offset);
        Ok(self.store.list(limit, offset).await?)
    }

    pub async fn check_users_exist(&self, ids: &[i64]) -> ServiceErrorResult<()> {
        if ids.is_empty() {
            return Err(ServiceError::invalid_input(
                "ids",
                "at least one ID is required",
            ));
        }

        Ok(self.store.check_users_exist(ids).await?)
    }
}
