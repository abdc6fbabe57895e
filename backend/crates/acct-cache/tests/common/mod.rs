#![allow(dead_code)]

//! Shared setup for the Redis cache tests.
//!
//! They run against a live server (`REDIS_URL`, default database 15 on
//! localhost), flush that database first, and are ignored by default:
//! run with `cargo test -p acct-cache -- --ignored`.

use acct_cache::RedisUserCache;
use acct_core::{Role, User};

use std::time::Duration;

use chrono::DateTime;

const DEFAULT_TEST_REDIS_URL: &str = "redis://127.0.0.1:6379/15";

pub fn redis_url() -> String {
    std::env::var("REDIS_URL").unwrap_or_else(|_| DEFAULT_TEST_REDIS_URL.to_string())
}

/// Connect to an emptied test database.
pub async fn fresh_cache() -> RedisUserCache {
    let client = redis::Client::open(redis_url()).expect("Invalid REDIS_URL");
    let mut conn = client
        .get_multiplexed_async_connection()
        .await
        .expect("Failed to connect to Redis");
    let () = redis::cmd("FLUSHDB")
        .query_async(&mut conn)
        .await
        .expect("Failed to flush test database");

    RedisUserCache::connect(&redis_url(), Duration::from_secs(2), Duration::from_secs(2))
        .await
        .expect("Failed to open cache")
}

/// Write raw fields under `key`, bypassing the repository.
pub async fn put_raw(key: &str, fields: &[(&str, &str)]) {
    let client = redis::Client::open(redis_url()).expect("Invalid REDIS_URL");
    let mut conn = client
        .get_multiplexed_async_connection()
        .await
        .expect("Failed to connect to Redis");
    let () = redis::cmd("HSET")
        .arg(key)
        .arg(fields)
        .query_async(&mut conn)
        .await
        .expect("Failed to write raw hash");
}

pub fn user(id: i64, name: &str) -> User {
    User {
        id,
        name: name.to_string(),
        email: format!("{name}@example.com"),
        role: Role::User,
        created_at: DateTime::from_timestamp_nanos(1_700_000_000_123_456_789),
        updated_at: DateTime::from_timestamp_nanos(1_700_000_000_987_654_321),
    }
}
