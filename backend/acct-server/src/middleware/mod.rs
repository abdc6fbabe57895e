//! Interceptors, outermost first: request logging, admission control,
//! circuit breaker, then the access check on protected routes.

pub mod access;
pub mod admission;
pub mod breaker;
pub mod request_logging;
