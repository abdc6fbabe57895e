use crate::{ConfigError, ConfigErrorResult};

use std::time::Duration;

use serde::Deserialize;

// Token bucket constraints
pub const MIN_RATE_LIMIT: u32 = 1;
pub const MAX_RATE_LIMIT: u32 = 100_000;
pub const DEFAULT_RATE_LIMIT: u32 = 10;

pub const MIN_RATE_PERIOD_MS: u64 = 1;
pub const MAX_RATE_PERIOD_MS: u64 = 3_600_000;
pub const DEFAULT_RATE_PERIOD_MS: u64 = 1_000;

/// Token-bucket admission control.
/// At most `limit` requests per `period_ms` sustained, bursts up to `limit`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub limit: u32,
    pub period_ms: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_RATE_LIMIT,
            period_ms: DEFAULT_RATE_PERIOD_MS,
        }
    }
}

impl RateLimitConfig {
    pub fn period(&self) -> Duration {
        Duration::from_millis(self.period_ms)
    }

    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.limit < MIN_RATE_LIMIT || self.limit > MAX_RATE_LIMIT {
            return Err(ConfigError::config(format!(
                "rate_limit.limit must be {}-{}, got {}",
                MIN_RATE_LIMIT, MAX_RATE_LIMIT, self.limit
            )));
        }

        if self.period_ms < MIN_RATE_PERIOD_MS || self.period_ms > MAX_RATE_PERIOD_MS {
            return Err(ConfigError::config(format!(
                "rate_limit.period_ms must be {}-{}, got {}",
                MIN_RATE_PERIOD_MS, MAX_RATE_PERIOD_MS, self.period_ms
            )));
        }

        Ok(())
    }
}
