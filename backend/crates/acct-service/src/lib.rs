pub mod access_service;
pub mod auth_service;
pub mod backend;
pub mod credential;
pub mod error;
pub mod metrics;
pub mod outcome;
pub mod paging;
pub mod resilience;
pub mod shutdown;
pub mod user_service;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use access_service::AccessService;
pub use auth_service::AuthService;
pub use backend::{Backend, LiveBackend};
pub use credential::{hash_credential, verify_credential};
pub use error::{CacheOperation, Result, ServiceError};
pub use metrics::Metrics;
pub use outcome::Outcome;
pub use paging::Paging;
pub use resilience::circuit_breaker::{
    BreakerSettings, CircuitBreaker, CircuitBreakerError, CircuitState,
};
pub use resilience::rate_limiter::TokenBucketLimiter;
pub use resilience::retry::{IsRetryable, RetryPolicy, with_retry};
pub use shutdown::{ShutdownCoordinator, ShutdownGuard};
pub use user_service::UserService;

#[cfg(test)]
mod tests;
