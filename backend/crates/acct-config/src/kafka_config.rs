use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

pub const DEFAULT_KAFKA_ENABLED: bool = false;
pub const DEFAULT_KAFKA_BROKER: &str = "localhost:9092";
pub const DEFAULT_GROUP_ID: &str = "user-service";
pub const DEFAULT_TOPIC: &str = "user-created";

pub const MIN_REDELIVERY_BACKOFF_MS: u64 = 10;
pub const MAX_REDELIVERY_BACKOFF_MS: u64 = 60_000;
pub const DEFAULT_REDELIVERY_BACKOFF_MS: u64 = 1_000;

/// Consumer-group settings for the user-created event stream.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KafkaConfig {
    pub enabled: bool,
    pub brokers: Vec<String>,
    pub group_id: String,
    /// Comma-separated list of topics
    pub topic: String,
    /// Pause before rejoining after a handler failure
    pub redelivery_backoff_ms: u64,
}

impl Default for KafkaConfig {
    fn default() -> Self {
        Self {
            enabled: DEFAULT_KAFKA_ENABLED,
            brokers: vec![String::from(DEFAULT_KAFKA_BROKER)],
            group_id: String::from(DEFAULT_GROUP_ID),
            topic: String::from(DEFAULT_TOPIC),
            redelivery_backoff_ms: DEFAULT_REDELIVERY_BACKOFF_MS,
        }
    }
}

impl KafkaConfig {
    pub fn topics(&self) -> Vec<String> {
        self.topic
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect()
    }

    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.redelivery_backoff_ms < MIN_REDELIVERY_BACKOFF_MS
            || self.redelivery_backoff_ms > MAX_REDELIVERY_BACKOFF_MS
        {
            return Err(ConfigError::config(format!(
                "kafka.redelivery_backoff_ms must be {}-{}, got {}",
                MIN_REDELIVERY_BACKOFF_MS, MAX_REDELIVERY_BACKOFF_MS, self.redelivery_backoff_ms
            )));
        }

        if !self.enabled {
            return Ok(());
        }

        if self.brokers.iter().all(|b| b.trim().is_empty()) {
            return Err(ConfigError::kafka(
                "kafka.brokers must list at least one broker",
            ));
        }

        if self.group_id.trim().is_empty() {
            return Err(ConfigError::kafka("kafka.group_id must not be empty"));
        }

        if self.topics().is_empty() {
            return Err(ConfigError::kafka("kafka.topic must name at least one topic"));
        }

        Ok(())
    }
}
