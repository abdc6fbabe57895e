use acct_config::PaginationConfig;

/// Page window rules for List.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    pub default_limit: i64,
    pub max_limit: i64,
}

impl Default for Paging {
    fn default() -> Self {
        Self::from(&PaginationConfig::default())
    }
}

impl From<&PaginationConfig> for Paging {
    fn from(config: &PaginationConfig) -> Self {
        Self {
            default_limit: i64::from(config.default_page_size),
            max_limit: i64::from(config.max_page_size),
        }
    }
}

impl Paging {
    /// Non-positive limit becomes the default, oversized limit is capped,
    /// negative offset is clamped to zero.
    pub fn normalize(&self, limit: i64, offset: i64) -> (i64, i64) {
        let limit = if limit <= 0 {
            self.default_limit
        } else {
            limit.min(self.max_limit)
        };
        (limit, offset.max(0))
    }
}
