use crate::{
    AuthConfig, CONFIG_DIR_ENV, CONFIG_FILENAME, CacheConfig, CircuitBreakerConfig, ConfigError,
    ConfigErrorResult, DEFAULT_CONFIG_DIR, DatabaseConfig, KafkaConfig, LoggingConfig,
    PaginationConfig, RateLimitConfig, ServerConfig,
};

use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cache: CacheConfig,
    pub kafka: KafkaConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
    pub rate_limit: RateLimitConfig,
    pub circuit_breaker: CircuitBreakerConfig,
    pub pagination: PaginationConfig,
}

impl Config {
    /// Load config.
    ///
    /// Loading order:
    /// 1. ACCT_CONFIG_DIR env var, else ./.acct/
    /// 2. Auto-create the config directory
    /// 3. Parse config.toml if present, else defaults
    /// 4. Apply ACCT_* environment variable overrides
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load() -> ConfigErrorResult<Self> {
        let config_dir = Self::config_dir()?;

        if !config_dir.exists() {
            std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::Io {
                path: config_dir.clone(),
                source: e,
            })?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);

        let mut config = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    fn load_toml(path: &Path) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Priority: ACCT_CONFIG_DIR env var > ./.acct/ (relative to cwd)
    pub fn config_dir() -> ConfigErrorResult<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }

        let cwd = std::env::current_dir()
            .map_err(|_| ConfigError::config("Cannot determine current working directory"))?;
        Ok(cwd.join(DEFAULT_CONFIG_DIR))
    }

    /// Validate all sections. Call after load() to fail fast at startup.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.server.validate()?;
        self.database.validate()?;
        self.cache.validate()?;
        self.kafka.validate()?;
        self.auth.validate()?;
        self.logging.validate()?;
        self.rate_limit.validate()?;
        self.circuit_breaker.validate()?;
        self.pagination.validate()?;

        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Log configuration summary (NEVER logs secrets).
    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!("  server: {}:{}", self.server.host, self.server.port);
        info!(
            "  database: {} (max {} connections, acquire {}s)",
            self.database.redacted_url(),
            self.database.max_connections,
            self.database.acquire_timeout_secs
        );
        info!(
            "  cache: timeouts connect={}s response={}s",
            self.cache.connection_timeout_secs, self.cache.response_timeout_secs
        );

        if self.kafka.enabled {
            info!(
                "  kafka: brokers={} group={} topic={} backoff={}ms",
                self.kafka.brokers.join(","),
                self.kafka.group_id,
                self.kafka.topic,
                self.kafka.redelivery_backoff_ms
            );
        } else {
            info!("  kafka: disabled");
        }

        info!(
            "  auth: {} (secret {}, access={}m, refresh={}m)",
            if self.auth.enabled {
                "enabled"
            } else {
                "disabled"
            },
            if self.auth.jwt_secret.is_some() {
                "configured"
            } else {
                "ephemeral"
            },
            self.auth.access_token_minutes,
            self.auth.refresh_token_minutes
        );

        info!(
            "  logging: {} (colored: {})",
            *self.logging.level, self.logging.colored
        );

        info!(
            "  rate_limit: {}/{}ms",
            self.rate_limit.limit, self.rate_limit.period_ms
        );

        info!(
            "  circuit_breaker: threshold={}, open={}s, window={}s, half_open={}/{}",
            self.circuit_breaker.failure_threshold,
            self.circuit_breaker.open_duration_secs,
            self.circuit_breaker.failure_window_secs,
            self.circuit_breaker.half_open_success_threshold,
            self.circuit_breaker.half_open_max_requests
        );

        info!(
            "  pagination: default={}, max={}",
            self.pagination.default_page_size, self.pagination.max_page_size
        );
    }

    fn apply_env_overrides(&mut self) {
        // Server
        Self::apply_env_string("ACCT_SERVER_HOST", &mut self.server.host);
        Self::apply_env_parse("ACCT_SERVER_PORT", &mut self.server.port);

        // Database
        Self::apply_env_string("ACCT_DATABASE_URL", &mut self.database.url);
        Self::apply_env_parse(
            "ACCT_DATABASE_MAX_CONNECTIONS",
            &mut self.database.max_connections,
        );
        Self::apply_env_parse(
            "ACCT_DATABASE_ACQUIRE_TIMEOUT_SECS",
            &mut self.database.acquire_timeout_secs,
        );

        // Cache
        Self::apply_env_string("ACCT_CACHE_URL", &mut self.cache.url);
        Self::apply_env_parse(
            "ACCT_CACHE_CONNECTION_TIMEOUT_SECS",
            &mut self.cache.connection_timeout_secs,
        );
        Self::apply_env_parse(
            "ACCT_CACHE_RESPONSE_TIMEOUT_SECS",
            &mut self.cache.response_timeout_secs,
        );

        // Kafka
        Self::apply_env_bool("ACCT_KAFKA_ENABLED", &mut self.kafka.enabled);
        Self::apply_env_list("ACCT_KAFKA_BROKERS", &mut self.kafka.brokers);
        Self::apply_env_string("ACCT_KAFKA_GROUP_ID", &mut self.kafka.group_id);
        Self::apply_env_string("ACCT_KAFKA_TOPIC", &mut self.kafka.topic);
        Self::apply_env_parse(
            "ACCT_KAFKA_REDELIVERY_BACKOFF_MS",
            &mut self.kafka.redelivery_backoff_ms,
        );

        // Auth
        Self::apply_env_bool("ACCT_AUTH_ENABLED", &mut self.auth.enabled);
        Self::apply_env_option_string("ACCT_AUTH_JWT_SECRET", &mut self.auth.jwt_secret);
        Self::apply_env_parse(
            "ACCT_AUTH_ACCESS_TOKEN_MINUTES",
            &mut self.auth.access_token_minutes,
        );
        Self::apply_env_parse(
            "ACCT_AUTH_REFRESH_TOKEN_MINUTES",
            &mut self.auth.refresh_token_minutes,
        );

        // Logging
        Self::apply_env_parse("ACCT_LOG_LEVEL", &mut self.logging.level);
        Self::apply_env_bool("ACCT_LOG_COLORED", &mut self.logging.colored);
        Self::apply_env_string("ACCT_LOG_DIR", &mut self.logging.dir);
        Self::apply_env_option_string("ACCT_LOG_FILE", &mut self.logging.file);

        // Rate limit
        Self::apply_env_parse("ACCT_RATE_LIMIT", &mut self.rate_limit.limit);
        Self::apply_env_parse("ACCT_RATE_LIMIT_PERIOD_MS", &mut self.rate_limit.period_ms);

        // Circuit breaker
        Self::apply_env_parse(
            "ACCT_CB_FAILURE_THRESHOLD",
            &mut self.circuit_breaker.failure_threshold,
        );
        Self::apply_env_parse(
            "ACCT_CB_OPEN_DURATION_SECS",
            &mut self.circuit_breaker.open_duration_secs,
        );
        Self::apply_env_parse(
            "ACCT_CB_HALF_OPEN_SUCCESS_THRESHOLD",
            &mut self.circuit_breaker.half_open_success_threshold,
        );
        Self::apply_env_parse(
            "ACCT_CB_HALF_OPEN_MAX_REQUESTS",
            &mut self.circuit_breaker.half_open_max_requests,
        );
        Self::apply_env_parse(
            "ACCT_CB_FAILURE_WINDOW_SECS",
            &mut self.circuit_breaker.failure_window_secs,
        );

        // Pagination
        Self::apply_env_parse(
            "ACCT_PAGINATION_DEFAULT_PAGE_SIZE",
            &mut self.pagination.default_page_size,
        );
        Self::apply_env_parse(
            "ACCT_PAGINATION_MAX_PAGE_SIZE",
            &mut self.pagination.max_page_size,
        );
    }

    /// Helper: Apply environment variable override for String values
    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// Helper: Apply environment variable override for bool values (accepts "true"/"1")
    fn apply_env_bool(var_name: &str, target: &mut bool) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val == "true" || val == "1";
        }
    }

    /// Helper: Apply environment variable override for parseable values
    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = parsed;
        }
    }

    /// Helper: Apply environment variable override for Option<String> values
    fn apply_env_option_string(var_name: &str, target: &mut Option<String>) {
        if let Ok(val) = std::env::var(var_name) {
            *target = Some(val);
        }
    }

    /// Helper: Apply environment variable override for comma-separated lists
    fn apply_env_list(var_name: &str, target: &mut Vec<String>) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }
    }
}
