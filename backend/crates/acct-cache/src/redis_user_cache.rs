use crate::key_order::numeric_page;
use crate::user_fields::{cache_key, from_fields, patch_fields, to_fields};
use crate::{CacheError, Result as CacheErrorResult, UserCache};

use acct_core::{ErrorLocation, User, UserPatch};

use std::collections::HashMap;
use std::future::Future;
use std::panic::Location;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, info};
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Script};

const SCAN_BATCH: usize = 100;

/// Only overwrites fields when the hash already exists, so a late update
/// cannot resurrect a deleted entry as a partial record.
const UPDATE_IF_EXISTS: &str = r#"
if redis.call('EXISTS', KEYS[1]) == 1 then
    redis.call('HSET', KEYS[1], unpack(ARGV))
    return 1
end
return 0
"#;

#[derive(Clone)]
pub struct RedisUserCache {
    conn: ConnectionManager,
    response_timeout: Duration,
    update_script: Script,
}

impl RedisUserCache {
    pub async fn connect(
        url: &str,
        connect_timeout: Duration,
        response_timeout: Duration,
    ) -> CacheErrorResult<Self> {
        let client = redis::Client::open(url)?;
        let conn = tokio::time::timeout(connect_timeout, ConnectionManager::new(client))
            .await
            .map_err(|_| CacheError::Timeout {
                operation: "connect",
                location: ErrorLocation::from(Location::caller()),
            })??;

        info!("Connected to Redis cache");

        Ok(Self {
            conn,
            response_timeout,
            update_script: Script::new(UPDATE_IF_EXISTS),
        })
    }

    async fn timed<T, F>(&self, operation: &'static str, fut: F) -> CacheErrorResult<T>
    where
        F: Future<Output = redis::RedisResult<T>>,
    {
        match tokio::time::timeout(self.response_timeout, fut).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(CacheError::Timeout {
                operation,
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }

    async fn scan_keys(&self) -> CacheErrorResult<Vec<String>> {
        let mut conn = self.conn.clone();
        let mut cursor: u64 = 0;
        let mut keys = Vec::new();

        loop {
            let (next, batch): (u64, Vec<String>) = self
                .timed(
                    "scan",
                    redis::cmd("SCAN")
                        .arg(cursor)
                        .arg("COUNT")
                        .arg(SCAN_BATCH)
                        .query_async(&mut conn),
                )
                .await?;
            keys.extend(batch);
            if next == 0 {
                break;
            }
            cursor = next;
        }

        Ok(keys)
    }
}

#[async_trait]
impl UserCache for RedisUserCache {
    async fn create(&self, user: &User) -> CacheErrorResult<()> {
        let fields = to_fields(user)?;
        let mut conn = self.conn.clone();
        let () = self
            .timed("create", conn.hset_multiple(cache_key(user.id), &fields))
            .await?;
        debug!("Cached user {}", user.id);
        Ok(())
    }

    async fn get(&self, id: i64) -> CacheErrorResult<User> {
        let mut conn = self.conn.clone();
        let fields: HashMap<String, String> =
            self.timed("get", conn.hgetall(cache_key(id))).await?;
        if fields.is_empty() {
            return Err(CacheError::NotFound {
                id,
                location: ErrorLocation::from(Location::caller()),
            });
        }
        from_fields(id, &fields)
    }

    async fn update(&self, patch: &UserPatch, updated_at: DateTime<Utc>) -> CacheErrorResult<bool> {
        let fields = patch_fields(patch, updated_at)?;
        let mut invocation = self.update_script.key(cache_key(patch.id));
        for (field, value) in &fields {
            invocation.arg(*field).arg(value);
        }

        let mut conn = self.conn.clone();
        let applied: i64 = self
            .timed("update", invocation.invoke_async(&mut conn))
            .await?;
        if applied == 0 {
            debug!("No cache entry for user {} to update", patch.id);
        }
        Ok(applied == 1)
    }

    async fn delete(&self, id: i64) -> CacheErrorResult<()> {
        let mut conn = self.conn.clone();
        let () = self.timed("delete", conn.del(cache_key(id))).await?;
        debug!("Evicted user {id} from cache");
        Ok(())
    }

    async fn list(&self, limit: usize, offset: usize) -> CacheErrorResult<Vec<User>> {
        let keys = self.scan_keys().await?;
        let mut users = Vec::new();
        for id in numeric_page(keys, limit, offset) {
            match self.get(id).await {
                Ok(user) => users.push(user),
                Err(e) if e.is_not_found() => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(users)
    }
}
