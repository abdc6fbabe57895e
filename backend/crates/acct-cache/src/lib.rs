pub mod error;
pub mod key_order;
pub mod redis_user_cache;
pub mod user_cache;
pub mod user_fields;

pub use error::{CacheError, Result};
pub use redis_user_cache::RedisUserCache;
pub use user_cache::UserCache;
