mod common;

use common::{fresh_cache, put_raw, user};

use acct_cache::{CacheError, UserCache};
use acct_core::{Role, UserPatch};

use chrono::DateTime;
use googletest::prelude::*;
use serial_test::serial;

#[tokio::test]
#[serial]
#[ignore = "requires a Redis server in REDIS_URL"]
async fn given_cached_user_when_get_then_all_fields_round_trip() {
    // Given
    let cache = fresh_cache().await;
    let alice = user(7, "alice");
    cache.create(&alice).await.unwrap();

    // When
    let fetched = cache.get(7).await.unwrap();

    // Then
    assert_that!(fetched, eq(&alice));
}

#[tokio::test]
#[serial]
#[ignore = "requires a Redis server in REDIS_URL"]
async fn given_no_entry_when_get_then_not_found() {
    // Given
    let cache = fresh_cache().await;

    // When
    let result = cache.get(41).await;

    // Then
    assert!(matches!(result, Err(CacheError::NotFound { id: 41, .. })));
}

#[tokio::test]
#[serial]
#[ignore = "requires a Redis server in REDIS_URL"]
async fn given_hash_missing_fields_when_get_then_decode_error() {
    // Given
    let cache = fresh_cache().await;
    put_raw("9", &[("name", "half")]).await;

    // When
    let result = cache.get(9).await;

    // Then
    assert!(result.is_err());
    assert!(!result.unwrap_err().is_not_found());
}

#[tokio::test]
#[serial]
#[ignore = "requires a Redis server in REDIS_URL"]
async fn given_cached_user_when_partial_update_then_only_patched_fields_change() {
    // Given
    let cache = fresh_cache().await;
    cache.create(&user(3, "carol")).await.unwrap();
    let updated_at = DateTime::from_timestamp_nanos(1_800_000_000_000_000_001);

    // When
    let applied = cache
        .update(&UserPatch::new(3).role(Role::Admin), updated_at)
        .await
        .unwrap();

    // Then
    assert_that!(applied, eq(true));
    let fetched = cache.get(3).await.unwrap();
    assert_that!(fetched.role, eq(Role::Admin));
    assert_that!(fetched.name, eq("carol"));
    assert_that!(fetched.updated_at, eq(updated_at));
}

#[tokio::test]
#[serial]
#[ignore = "requires a Redis server in REDIS_URL"]
async fn given_evicted_entry_when_update_then_no_partial_hash_created() {
    // Given
    let cache = fresh_cache().await;
    let updated_at = DateTime::from_timestamp_nanos(1_800_000_000_000_000_001);

    // When
    let applied = cache
        .update(&UserPatch::new(5).name("ghost"), updated_at)
        .await
        .unwrap();

    // Then
    assert_that!(applied, eq(false));
    assert!(matches!(cache.get(5).await, Err(CacheError::NotFound { .. })));
}

#[tokio::test]
#[serial]
#[ignore = "requires a Redis server in REDIS_URL"]
async fn given_cached_user_when_delete_then_gone() {
    // Given
    let cache = fresh_cache().await;
    cache.create(&user(2, "bob")).await.unwrap();

    // When
    cache.delete(2).await.unwrap();

    // Then
    assert!(matches!(cache.get(2).await, Err(CacheError::NotFound { .. })));
}

#[tokio::test]
#[serial]
#[ignore = "requires a Redis server in REDIS_URL"]
async fn given_multi_digit_ids_when_list_then_numeric_order_and_foreign_keys_skipped() {
    // Given
    let cache = fresh_cache().await;
    for (id, name) in [(10, "ten"), (2, "two"), (1, "one"), (100, "hundred")] {
        cache.create(&user(id, name)).await.unwrap();
    }
    put_raw("session:abc", &[("token", "x")]).await;

    // When
    let first = cache.list(2, 0).await.unwrap();
    let rest = cache.list(10, 2).await.unwrap();

    // Then
    let first_ids: Vec<i64> = first.iter().map(|u| u.id).collect();
    let rest_ids: Vec<i64> = rest.iter().map(|u| u.id).collect();
    assert_that!(first_ids, eq(&vec![1, 2]));
    assert_that!(rest_ids, eq(&vec![10, 100]));
}
