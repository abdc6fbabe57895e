use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

pub const MIN_PAGE_SIZE: u32 = 1;
pub const MAX_PAGE_SIZE: u32 = 10_000;
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const DEFAULT_MAX_PAGE_SIZE: u32 = 1_000;

/// List paging. A non-positive requested limit uses `default_page_size`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
        }
    }
}

impl PaginationConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.max_page_size < MIN_PAGE_SIZE || self.max_page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::config(format!(
                "pagination.max_page_size must be {}-{}, got {}",
                MIN_PAGE_SIZE, MAX_PAGE_SIZE, self.max_page_size
            )));
        }

        if self.default_page_size < MIN_PAGE_SIZE || self.default_page_size > self.max_page_size {
            return Err(ConfigError::config(format!(
                "pagination.default_page_size must be {}-{}, got {}",
                MIN_PAGE_SIZE, self.max_page_size, self.default_page_size
            )));
        }

        Ok(())
    }
}
