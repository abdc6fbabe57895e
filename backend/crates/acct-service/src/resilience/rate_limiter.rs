use crate::ShutdownGuard;

use acct_config::RateLimitConfig;

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use log::debug;
use tokio::time::{Instant, MissedTickBehavior};

const MIN_REFILL_INTERVAL: Duration = Duration::from_micros(1);

/// Token-bucket admission control.
///
/// Starts full; a background task adds one token every `period / limit`
/// until the shutdown guard fires. `allow` never waits.
#[derive(Clone)]
pub struct TokenBucketLimiter {
    tokens: Arc<AtomicU32>,
    limit: u32,
}

impl TokenBucketLimiter {
    /// Must be called inside a Tokio runtime.
    pub fn start(limit: u32, period: Duration, mut shutdown: ShutdownGuard) -> Self {
        let limit = limit.max(1);
        let tokens = Arc::new(AtomicU32::new(limit));
        let refill_every = (period / limit).max(MIN_REFILL_INTERVAL);

        let pool = Arc::clone(&tokens);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + refill_every, refill_every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = shutdown.wait() => {
                        debug!("Token bucket replenisher stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        let _ = pool.fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                            (n < limit).then_some(n + 1)
                        });
                    }
                }
            }
        });

        Self { tokens, limit }
    }

    pub fn from_config(config: &RateLimitConfig, shutdown: ShutdownGuard) -> Self {
        Self::start(config.limit, config.period(), shutdown)
    }

    /// Take one token if any are left.
    pub fn allow(&self) -> bool {
        self.tokens
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
            .is_ok()
    }

    pub fn available(&self) -> u32 {
        self.tokens.load(Ordering::Acquire)
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }
}
