use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

pub const DEFAULT_AUTH_ENABLED: bool = false;

pub const MIN_JWT_SECRET_LEN: usize = 32;

pub const MIN_ACCESS_TOKEN_MINUTES: i64 = 1;
pub const MAX_ACCESS_TOKEN_MINUTES: i64 = 1_440;
pub const DEFAULT_ACCESS_TOKEN_MINUTES: i64 = 5;

pub const MIN_REFRESH_TOKEN_MINUTES: i64 = 1;
pub const MAX_REFRESH_TOKEN_MINUTES: i64 = 43_200;
pub const DEFAULT_REFRESH_TOKEN_MINUTES: i64 = 60;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Gate protected routes behind the access check
    pub enabled: bool,
    /// HS256 signing secret. Never logged.
    pub jwt_secret: Option<String>,
    pub access_token_minutes: i64,
    pub refresh_token_minutes: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enabled: DEFAULT_AUTH_ENABLED,
            jwt_secret: None,
            access_token_minutes: DEFAULT_ACCESS_TOKEN_MINUTES,
            refresh_token_minutes: DEFAULT_REFRESH_TOKEN_MINUTES,
        }
    }
}

impl AuthConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        match &self.jwt_secret {
            Some(secret) if secret.len() < MIN_JWT_SECRET_LEN => {
                return Err(ConfigError::auth(format!(
                    "auth.jwt_secret must be at least {} bytes",
                    MIN_JWT_SECRET_LEN
                )));
            }
            None if self.enabled => {
                return Err(ConfigError::auth(
                    "auth.jwt_secret is required when auth is enabled",
                ));
            }
            _ => {}
        }

        if self.access_token_minutes < MIN_ACCESS_TOKEN_MINUTES
            || self.access_token_minutes > MAX_ACCESS_TOKEN_MINUTES
        {
            return Err(ConfigError::config(format!(
                "auth.access_token_minutes must be {}-{}, got {}",
                MIN_ACCESS_TOKEN_MINUTES, MAX_ACCESS_TOKEN_MINUTES, self.access_token_minutes
            )));
        }

        if self.refresh_token_minutes < MIN_REFRESH_TOKEN_MINUTES
            || self.refresh_token_minutes > MAX_REFRESH_TOKEN_MINUTES
        {
            return Err(ConfigError::config(format!(
                "auth.refresh_token_minutes must be {}-{}, got {}",
                MIN_REFRESH_TOKEN_MINUTES, MAX_REFRESH_TOKEN_MINUTES, self.refresh_token_minutes
            )));
        }

        if self.access_token_minutes > self.refresh_token_minutes {
            return Err(ConfigError::auth(
                "auth.access_token_minutes cannot exceed auth.refresh_token_minutes",
            ));
        }

        Ok(())
    }
}
