use acct_db::DbError;

use std::fmt::Display;
use std::time::Duration;

use tokio::time::sleep;

const DEFAULT_MAX_ATTEMPTS: u32 = 5;
const DEFAULT_INITIAL_DELAY_MS: u64 = 200;
const DEFAULT_MAX_DELAY_SECS: u64 = 5;
const DEFAULT_BACKOFF_MULTIPLIER: f64 = 2.0;
const DEFAULT_JITTER_ENABLED: bool = true;

/// Backoff schedule for connecting to external dependencies
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub backoff_multiplier: f64,
    /// Scale each delay by a random factor in 0.5..1.5
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_delay: Duration::from_millis(DEFAULT_INITIAL_DELAY_MS),
            max_delay: Duration::from_secs(DEFAULT_MAX_DELAY_SECS),
            backoff_multiplier: DEFAULT_BACKOFF_MULTIPLIER,
            jitter: DEFAULT_JITTER_ENABLED,
        }
    }
}

impl RetryPolicy {
    /// Pause after the `failed`-th failed attempt (1-based): the initial delay
    /// grown by the multiplier once per earlier failure, capped at `max_delay`.
    pub fn backoff(&self, failed: u32) -> Duration {
        let exponent = i32::try_from(failed.saturating_sub(1)).unwrap_or(i32::MAX);
        let grown = self.initial_delay.as_secs_f64() * self.backoff_multiplier.powi(exponent);
        Duration::from_secs_f64(grown.min(self.max_delay.as_secs_f64()))
    }

    fn pause(&self, failed: u32) -> Duration {
        let base = self.backoff(failed);
        if self.jitter {
            base.mul_f64(0.5 + rand::random::<f64>())
        } else {
            base
        }
    }
}

/// Reach a dependency (store, cache, broker group), retrying while its
/// failures look transient. Permanent errors return on the first attempt.
pub async fn with_retry<F, Fut, T, E>(
    policy: &RetryPolicy,
    dependency: &str,
    mut attempt: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display + IsRetryable,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut failed = 0;

    loop {
        let error = match attempt().await {
            Ok(value) => {
                if failed > 0 {
                    log::info!("{dependency} reachable after {} attempts", failed + 1);
                }
                return Ok(value);
            }
            Err(e) => e,
        };
        failed += 1;

        if !error.is_retryable() {
            log::error!("{dependency} failed permanently: {error}");
            return Err(error);
        }
        if failed >= max_attempts {
            log::warn!("{dependency} still unavailable after {failed} attempts: {error}");
            return Err(error);
        }

        let pause = policy.pause(failed);
        log::debug!(
            "{dependency} unavailable ({failed}/{max_attempts}), next try in {pause:?}: {error}"
        );
        sleep(pause).await;
    }
}

/// Errors that can indicate a transient condition
pub trait IsRetryable {
    fn is_retryable(&self) -> bool;
}

impl IsRetryable for DbError {
    fn is_retryable(&self) -> bool {
        match self {
            DbError::Sqlx { source, .. } => matches!(
                source,
                sqlx::Error::Io(_)
                    | sqlx::Error::PoolTimedOut
                    | sqlx::Error::PoolClosed
                    | sqlx::Error::Tls(_)
            ),
            _ => false,
        }
    }
}

impl IsRetryable for acct_cache::CacheError {
    fn is_retryable(&self) -> bool {
        match self {
            acct_cache::CacheError::Redis { source, .. } => {
                source.is_io_error() || source.is_connection_refusal() || source.is_timeout()
            }
            acct_cache::CacheError::Timeout { .. } => true,
            _ => false,
        }
    }
}
