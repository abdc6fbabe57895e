use acct_config::CircuitBreakerConfig;

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;

/// Circuit breaker states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    /// Normal operation - requests flow through
    Closed,
    /// Too many failures - requests rejected immediately
    Open,
    /// Probing recovery - a bounded number of trial requests allowed
    HalfOpen,
}

#[derive(Debug, Clone)]
pub struct BreakerSettings {
    /// Consecutive failures before opening
    pub failure_threshold: u32,
    /// Time to stay open before admitting a trial
    pub open_duration: Duration,
    /// Trial successes needed to close again
    pub half_open_success_threshold: u32,
    /// Concurrent trials while half-open
    pub half_open_max_requests: u32,
    /// Failures further apart than this do not accumulate
    pub failure_window: Duration,
}

impl Default for BreakerSettings {
    fn default() -> Self {
        Self::from(&CircuitBreakerConfig::default())
    }
}

impl From<&CircuitBreakerConfig> for BreakerSettings {
    fn from(config: &CircuitBreakerConfig) -> Self {
        Self {
            failure_threshold: config.failure_threshold.max(1),
            open_duration: Duration::from_secs(config.open_duration_secs),
            half_open_success_threshold: config.half_open_success_threshold.max(1),
            half_open_max_requests: config.half_open_max_requests.max(1),
            failure_window: Duration::from_secs(config.failure_window_secs),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CircuitBreakerError {
    #[error("Circuit breaker open. Retry after {retry_after_secs} seconds")]
    CircuitOpen { retry_after_secs: u64 },
}

#[derive(Debug)]
struct Inner {
    state: CircuitState,
    consecutive_failures: u32,
    last_failure: Option<Instant>,
    opened_at: Instant,
    trials_in_flight: u32,
    trial_successes: u32,
}

/// Thread-safe circuit breaker
#[derive(Debug)]
pub struct CircuitBreaker {
    settings: BreakerSettings,
    inner: Mutex<Inner>,
}

impl CircuitBreaker {
    pub fn new(settings: BreakerSettings) -> Self {
        Self {
            settings,
            inner: Mutex::new(Inner {
                state: CircuitState::Closed,
                consecutive_failures: 0,
                last_failure: None,
                opened_at: Instant::now(),
                trials_in_flight: 0,
                trial_successes: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Check if a request should be admitted. A caller that gets `Ok` must
    /// follow up with `record_success`, `record_failure` or `abandon`.
    pub fn allow_request(&self) -> Result<(), CircuitBreakerError> {
        let mut inner = self.lock();

        match inner.state {
            CircuitState::Closed => Ok(()),
            CircuitState::Open => {
                let elapsed = inner.opened_at.elapsed();
                if elapsed >= self.settings.open_duration {
                    inner.state = CircuitState::HalfOpen;
                    inner.trials_in_flight = 1;
                    inner.trial_successes = 0;
                    log::info!("Circuit breaker transitioning to HalfOpen");
                    Ok(())
                } else {
                    let remaining = self.settings.open_duration - elapsed;
                    Err(CircuitBreakerError::CircuitOpen {
                        retry_after_secs: remaining.as_secs_f64().ceil() as u64,
                    })
                }
            }
            CircuitState::HalfOpen => {
                if inner.trials_in_flight < self.settings.half_open_max_requests {
                    inner.trials_in_flight += 1;
                    Ok(())
                } else {
                    Err(CircuitBreakerError::CircuitOpen {
                        retry_after_secs: 1,
                    })
                }
            }
        }
    }

    /// Record a successful request
    pub fn record_success(&self) {
        let mut inner = self.lock();

        match inner.state {
            CircuitState::Closed => {
                inner.consecutive_failures = 0;
            }
            CircuitState::HalfOpen => {
                inner.trials_in_flight = inner.trials_in_flight.saturating_sub(1);
                inner.trial_successes += 1;
                if inner.trial_successes >= self.settings.half_open_success_threshold {
                    let successes = inner.trial_successes;
                    inner.state = CircuitState::Closed;
                    inner.consecutive_failures = 0;
                    inner.last_failure = None;
                    inner.trials_in_flight = 0;
                    log::info!("Circuit breaker closed after {} successes", successes);
                }
            }
            // Late result from a request admitted before the circuit opened
            CircuitState::Open => {}
        }
    }

    /// Record a failed request
    pub fn record_failure(&self) {
        let now = Instant::now();
        let mut inner = self.lock();

        match inner.state {
            CircuitState::Closed => {
                let stale = inner
                    .last_failure
                    .is_some_and(|at| now.duration_since(at) > self.settings.failure_window);
                if stale {
                    inner.consecutive_failures = 0;
                }
                inner.consecutive_failures += 1;
                inner.last_failure = Some(now);

                if inner.consecutive_failures >= self.settings.failure_threshold {
                    inner.state = CircuitState::Open;
                    inner.opened_at = now;
                    log::warn!(
                        "Circuit breaker OPEN after {} failures",
                        inner.consecutive_failures
                    );
                }
            }
            CircuitState::HalfOpen => {
                inner.state = CircuitState::Open;
                inner.opened_at = now;
                inner.trials_in_flight = 0;
                inner.trial_successes = 0;
                log::warn!("Circuit breaker reopened due to failure in HalfOpen state");
            }
            CircuitState::Open => {}
        }
    }

    /// Release an admitted request that finished without a verdict (e.g. cancelled).
    pub fn abandon(&self) {
        let mut inner = self.lock();
        if inner.state == CircuitState::HalfOpen {
            inner.trials_in_flight = inner.trials_in_flight.saturating_sub(1);
        }
    }

    pub fn state(&self) -> CircuitState {
        self.lock().state
    }
}
