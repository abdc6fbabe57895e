use acct_service::{
    AccessService, AuthService, Backend, CircuitBreaker, Metrics, TokenBucketLimiter, UserService,
};

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;

/// Shared state for handlers and interceptors
pub struct AppState<B: Backend> {
    pub users: UserService<B>,
    pub auth: Arc<AuthService<B>>,
    pub access: Arc<AccessService<B>>,
    pub limiter: TokenBucketLimiter,
    pub breaker: Arc<CircuitBreaker>,
    pub metrics: Metrics,
    /// Gate protected routes behind the access check
    pub auth_enabled: bool,
    pub prometheus: Option<PrometheusHandle>,
}

impl<B: Backend> AppState<B> {
    pub fn new(
        users: UserService<B>,
        auth: AuthService<B>,
        access: AccessService<B>,
        limiter: TokenBucketLimiter,
        breaker: CircuitBreaker,
    ) -> Self {
        Self {
            users,
            auth: Arc::new(auth),
            access: Arc::new(access),
            limiter,
            breaker: Arc::new(breaker),
            metrics: Metrics::new(),
            auth_enabled: false,
            prometheus: None,
        }
    }

    pub fn with_auth_enabled(mut self, enabled: bool) -> Self {
        self.auth_enabled = enabled;
        self
    }

    pub fn with_prometheus(mut self, handle: PrometheusHandle) -> Self {
        self.prometheus = Some(handle);
        self
    }
}

impl<B: Backend> Clone for AppState<B> {
    fn clone(&self) -> Self {
        Self {
            users: self.users.clone(),
            auth: Arc::clone(&self.auth),
            access: Arc::clone(&self.access),
            limiter: self.limiter.clone(),
            breaker: Arc::clone(&self.breaker),
            metrics: self.metrics.clone(),
            auth_enabled: self.auth_enabled,
            prometheus: self.prometheus.clone(),
        }
    }
}
