use crate::{IsRetryable, RetryPolicy, with_retry};

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use googletest::prelude::*;

#[derive(Debug)]
struct Flaky {
    transient: bool,
}

impl std::fmt::Display for Flaky {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "flaky (transient: {})", self.transient)
    }
}

impl IsRetryable for Flaky {
    fn is_retryable(&self) -> bool {
        self.transient
    }
}

fn policy() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        initial_delay: Duration::from_millis(10),
        max_delay: Duration::from_millis(40),
        backoff_multiplier: 2.0,
        jitter: false,
    }
}

#[tokio::test(start_paused = true)]
async fn given_transient_failures_when_retrying_then_eventually_succeeds() {
    // Given
    let calls = AtomicU32::new(0);

    // When
    let result = with_retry(&policy(), "connect", || async {
        if calls.fetch_add(1, Ordering::SeqCst) < 2 {
            Err(Flaky { transient: true })
        } else {
            Ok(42)
        }
    })
    .await;

    // Then
    assert_that!(result, ok(eq(&42)));
    assert_that!(calls.load(Ordering::SeqCst), eq(3));
}

#[tokio::test(start_paused = true)]
async fn given_permanent_failure_when_retrying_then_gives_up_immediately() {
    // Given
    let calls = AtomicU32::new(0);

    // When
    let result: Result<(), Flaky> = with_retry(&policy(), "connect", || async {
        calls.fetch_add(1, Ordering::SeqCst);
        Err(Flaky { transient: false })
    })
    .await;

    // Then
    assert!(result.is_err());
    assert_that!(calls.load(Ordering::SeqCst), eq(1));
}

#[tokio::test(start_paused = true)]
async fn given_endless_transient_failures_when_retrying_then_stops_at_max_attempts() {
    // Given
    let calls = AtomicU32::new(0);

    // When
    let result: Result<(), Flaky> = with_retry(&policy(), "connect", || async {
        calls.fetch_add(1, Ordering::SeqCst);
        Err(Flaky { transient: true })
    })
    .await;

    // Then
    assert!(result.is_err());
    assert_that!(calls.load(Ordering::SeqCst), eq(3));
}

#[test]
fn given_policy_when_backoff_then_grows_until_capped() {
    // Given
    let policy = policy();

    // When
    let schedule: Vec<Duration> = (1..=4).map(|failed| policy.backoff(failed)).collect();

    // Then
    assert_that!(
        schedule,
        eq(&vec![
            Duration::from_millis(10),
            Duration::from_millis(20),
            Duration::from_millis(40),
            Duration::from_millis(40),
        ])
    );
}

#[tokio::test(start_paused = true)]
async fn given_zero_max_attempts_when_retrying_then_still_tries_once() {
    // Given
    let calls = AtomicU32::new(0);
    let policy = RetryPolicy {
        max_attempts: 0,
        ..policy()
    };

    // When
    let result: Result<(), Flaky> = with_retry(&policy, "Redis", || async {
        calls.fetch_add(1, Ordering::SeqCst);
        Err(Flaky { transient: true })
    })
    .await;

    // Then
    assert!(result.is_err());
    assert_that!(calls.load(Ordering::SeqCst), eq(1));
}
