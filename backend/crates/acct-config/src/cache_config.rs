use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

pub const DEFAULT_CACHE_URL: &str = "redis://127.0.0.1:6379";

pub const MIN_CACHE_TIMEOUT_SECS: u64 = 1;
pub const MAX_CACHE_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_CONNECTION_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_RESPONSE_TIMEOUT_SECS: u64 = 2;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub url: String,
    pub connection_timeout_secs: u64,
    pub response_timeout_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            url: String::from(DEFAULT_CACHE_URL),
            connection_timeout_secs: DEFAULT_CONNECTION_TIMEOUT_SECS,
            response_timeout_secs: DEFAULT_RESPONSE_TIMEOUT_SECS,
        }
    }
}

impl CacheConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if !(self.url.starts_with("redis://") || self.url.starts_with("rediss://")) {
            return Err(ConfigError::cache(
                "cache.url must start with redis:// or rediss://",
            ));
        }

        for (field, value) in [
            ("connection_timeout_secs", self.connection_timeout_secs),
            ("response_timeout_secs", self.response_timeout_secs),
        ] {
            if !(MIN_CACHE_TIMEOUT_SECS..=MAX_CACHE_TIMEOUT_SECS).contains(&value) {
                return Err(ConfigError::config(format!(
                    "cache.{} must be {}-{}, got {}",
                    field, MIN_CACHE_TIMEOUT_SECS, MAX_CACHE_TIMEOUT_SECS, value
                )));
            }
        }

        Ok(())
    }
}
