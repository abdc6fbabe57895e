use super::fake_broker::{FakeBroker, UnreachableBroker};
use crate::{EventConsumer, EventError, UserSaveHandler};

use acct_service::ShutdownCoordinator;
use acct_service::testing::{Faults, MemoryBackend, MemoryHarness};

use std::time::Duration;

use googletest::prelude::*;

const BACKOFF: Duration = Duration::from_millis(20);

fn event(name: &str) -> Vec<u8> {
    format!(r#"{{"name":"{name}","email":"{name}@example.com","role":"USER"}}"#).into_bytes()
}

fn consumer(
    broker: &FakeBroker,
    harness: &MemoryHarness,
) -> EventConsumer<FakeBroker, UserSaveHandler<MemoryBackend>> {
    EventConsumer::new(
        broker.clone(),
        UserSaveHandler::new(harness.user_service()),
        BACKOFF,
    )
}

async fn wait_until(mut done: impl FnMut() -> bool) {
    for _ in 0..1_000 {
        if done() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not reached");
}

#[tokio::test(start_paused = true)]
async fn given_user_created_event_when_consumed_then_user_stored_cached_and_committed() {
    // Given
    let harness = MemoryHarness::new();
    let broker = FakeBroker::default();
    broker.publish(event("ann"));
    let shutdown = ShutdownCoordinator::new();
    let task = tokio::spawn(consumer(&broker, &harness).run(shutdown.subscribe_guard()));

    // When
    wait_until(|| broker.committed() == 1).await;
    shutdown.shutdown();
    let result = task.await.unwrap();

    // Then
    assert!(matches!(result, Err(EventError::Cancelled { .. })));
    let stored = harness.stored_user(1).unwrap();
    assert_that!(stored.name, eq("ann"));
    assert!(harness.cache.contains(1));
    assert_that!(harness.audit_records(), len(eq(1)));
}

#[tokio::test(start_paused = true)]
async fn given_malformed_payload_when_consumed_then_acked_and_next_event_applied() {
    // Given
    let harness = MemoryHarness::new();
    let broker = FakeBroker::default();
    broker.publish(b"{not json".to_vec());
    broker.publish(br#"{"name":"bad","email":"not-an-email"}"#.to_vec());
    broker.publish(event("ben"));
    let shutdown = ShutdownCoordinator::new();
    let task = tokio::spawn(consumer(&broker, &harness).run(shutdown.subscribe_guard()));

    // When
    wait_until(|| broker.committed() == 3).await;
    shutdown.shutdown();
    task.await.unwrap().ok();

    // Then
    assert_that!(harness.stored_user(1).unwrap().name, eq("ben"));
    assert!(harness.stored_user(2).is_none());
    assert_that!(broker.joins(), eq(1));
}

#[tokio::test(start_paused = true)]
async fn given_store_failure_when_consumed_then_message_redelivered_after_rejoin() {
    // Given
    let harness = MemoryHarness::new();
    Faults::set(&harness.faults.store_writes, true);
    let broker = FakeBroker::default();
    broker.publish(event("cat"));
    let shutdown = ShutdownCoordinator::new();
    let task = tokio::spawn(consumer(&broker, &harness).run(shutdown.subscribe_guard()));

    // When
    wait_until(|| broker.joins() >= 2).await;
    assert_that!(broker.committed(), eq(0));
    Faults::set(&harness.faults.store_writes, false);
    wait_until(|| broker.committed() == 1).await;
    shutdown.shutdown();
    task.await.unwrap().ok();

    // Then
    assert_that!(harness.stored_user(1).unwrap().name, eq("cat"));
    assert!(harness.stored_user(2).is_none());
}

#[tokio::test(start_paused = true)]
async fn given_event_already_applied_when_redelivered_then_acked_without_duplicate() {
    // Given
    let harness = MemoryHarness::new();
    let broker = FakeBroker::default();
    broker.publish(event("dan"));
    broker.publish(event("dan"));
    let shutdown = ShutdownCoordinator::new();
    let task = tokio::spawn(consumer(&broker, &harness).run(shutdown.subscribe_guard()));

    // When
    wait_until(|| broker.committed() == 2).await;
    shutdown.shutdown();
    task.await.unwrap().ok();

    // Then
    assert!(harness.stored_user(1).is_some());
    assert!(harness.stored_user(2).is_none());
    assert_that!(harness.audit_records(), len(eq(1)));
    assert_that!(broker.joins(), eq(1));
}

#[tokio::test(start_paused = true)]
async fn given_cache_write_failure_when_consumed_then_store_kept_and_message_acked() {
    // Given
    let harness = MemoryHarness::new();
    Faults::set(&harness.faults.cache_writes, true);
    let broker = FakeBroker::default();
    broker.publish(event("eve"));
    let shutdown = ShutdownCoordinator::new();
    let task = tokio::spawn(consumer(&broker, &harness).run(shutdown.subscribe_guard()));

    // When
    wait_until(|| broker.committed() == 1).await;
    shutdown.shutdown();
    task.await.unwrap().ok();

    // Then
    assert!(harness.stored_user(1).is_some());
    assert!(!harness.cache.contains(1));
    assert_that!(broker.joins(), eq(1));
}

#[tokio::test(start_paused = true)]
async fn given_shutdown_already_signalled_when_run_then_cancelled_without_joining() {
    // Given
    let harness = MemoryHarness::new();
    let broker = FakeBroker::default();
    let shutdown = ShutdownCoordinator::new();
    shutdown.shutdown();

    // When
    let result = consumer(&broker, &harness)
        .run(shutdown.subscribe_guard())
        .await;

    // Then
    assert!(matches!(result, Err(EventError::Cancelled { .. })));
    assert_that!(broker.joins(), eq(0));
}

#[tokio::test(start_paused = true)]
async fn given_unreachable_group_when_run_then_join_error_returned() {
    // Given
    let harness = MemoryHarness::new();
    let shutdown = ShutdownCoordinator::new();
    let consumer = EventConsumer::new(
        UnreachableBroker,
        UserSaveHandler::new(harness.user_service()),
        BACKOFF,
    );

    // When
    let result = consumer.run(shutdown.subscribe_guard()).await;

    // Then
    assert!(matches!(result, Err(EventError::Join { .. })));
}
