pub mod circuit_breaker;
pub mod rate_limiter;
pub mod retry;
