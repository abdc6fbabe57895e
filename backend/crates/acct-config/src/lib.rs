mod auth_config;
mod cache_config;
mod circuit_breaker_config;
mod config;
mod database_config;
mod error;
mod kafka_config;
mod log_level;
mod logging_config;
mod pagination_config;
mod rate_limit_config;
mod server_config;

pub use auth_config::AuthConfig;
pub use cache_config::CacheConfig;
pub use circuit_breaker_config::CircuitBreakerConfig;
pub use config::Config;
pub use database_config::DatabaseConfig;
pub use error::{ConfigError, ConfigErrorResult};
pub use kafka_config::KafkaConfig;
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;
pub use pagination_config::PaginationConfig;
pub use rate_limit_config::RateLimitConfig;
pub use server_config::ServerConfig;

const CONFIG_DIR_ENV: &str = "ACCT_CONFIG_DIR";
const DEFAULT_CONFIG_DIR: &str = ".acct";
const CONFIG_FILENAME: &str = "config.toml";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const MIN_PORT: u16 = 1024;

const DEFAULT_LOG_LEVEL_STRING: &str = "info";
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
const DEFAULT_LOG_DIRECTORY: &str = "log";
const DEFAULT_LOG_COLORED: bool = true;

#[cfg(test)]
mod tests;
