use crate::testing::Faults;

use acct_cache::key_order::numeric_page;
use acct_cache::user_fields::{cache_key, from_fields, patch_fields, to_fields};
use acct_cache::{CacheError, Result as CacheErrorResult, UserCache};
use acct_core::{ErrorLocation, User, UserPatch};

use std::collections::HashMap;
use std::panic::Location;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

type Hashes = HashMap<String, HashMap<String, String>>;

/// Field-map cache using the same encoding as the Redis repository.
pub struct MemoryUserCache {
    hashes: Mutex<Hashes>,
    hits: AtomicUsize,
    faults: Arc<Faults>,
}

impl MemoryUserCache {
    pub(crate) fn new(faults: Arc<Faults>) -> Self {
        Self {
            hashes: Mutex::new(HashMap::new()),
            hits: AtomicUsize::new(0),
            faults,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Hashes> {
        self.hashes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of reads answered from the cache.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn contains(&self, id: i64) -> bool {
        self.lock().contains_key(&cache_key(id))
    }

    /// Raw fields for `id`, bypassing fault injection.
    pub fn raw(&self, id: i64) -> Option<HashMap<String, String>> {
        self.lock().get(&cache_key(id)).cloned()
    }

    /// Store arbitrary fields under an arbitrary key.
    pub fn put_raw(&self, key: &str, fields: &[(&str, &str)]) {
        self.lock().insert(
            key.to_string(),
            fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        );
    }

    fn write(&self, key: String, fields: Vec<(&'static str, String)>) {
        let mut hashes = self.lock();
        let hash = hashes.entry(key).or_default();
        for (field, value) in fields {
            hash.insert(field.to_string(), value);
        }
    }
}

#[async_trait]
impl UserCache for MemoryUserCache {
    async fn create(&self, user: &User) -> CacheErrorResult<()> {
        Faults::check_cache(&self.faults.cache_writes, "create")?;
        self.write(cache_key(user.id), to_fields(user)?);
        Ok(())
    }

    async fn get(&self, id: i64) -> CacheErrorResult<User> {
        Faults::check_cache(&self.faults.cache_reads, "get")?;
        let fields = self.lock().get(&cache_key(id)).cloned().unwrap_or_default();
        if fields.is_empty() {
            return Err(CacheError::NotFound {
                id,
                location: ErrorLocation::from(Location::caller()),
            });
        }
        let user = from_fields(id, &fields)?;
        self.hits.fetch_add(1, Ordering::SeqCst);
        Ok(user)
    }

    async fn update(&self, patch: &UserPatch, updated_at: DateTime<Utc>) -> CacheErrorResult<bool> {
        Faults::check_cache(&self.faults.cache_writes, "update")?;
        let key = cache_key(patch.id);
        if !self.lock().contains_key(&key) {
            return Ok(false);
        }
        self.write(key, patch_fields(patch, updated_at)?);
        Ok(true)
    }

    async fn delete(&self, id: i64) -> CacheErrorResult<()> {
        Faults::check_cache(&self.faults.cache_deletes, "delete")?;
        self.lock().remove(&cache_key(id));
        Ok(())
    }

    async fn list(&self, limit: usize, offset: usize) -> CacheErrorResult<Vec<User>> {
        Faults::check_cache(&self.faults.cache_reads, "list")?;
        let keys: Vec<String> = self.lock().keys().cloned().collect();
        let mut users = Vec::new();
        for id in numeric_page(keys, limit, offset) {
            users.push(self.get(id).await?);
        }
        Ok(users)
    }
}
