use crate::{ApiError, AppState};

use acct_service::{Backend, CircuitBreaker, CircuitBreakerError, CircuitState};

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use log::warn;

/// Releases an admitted request that never produced a response.
struct Admitted<'a> {
    breaker: &'a CircuitBreaker,
    settled: bool,
}

impl Admitted<'_> {
    fn settle(mut self, server_failure: bool) {
        if server_failure {
            self.breaker.record_failure();
        } else {
            self.breaker.record_success();
        }
        self.settled = true;
    }
}

impl Drop for Admitted<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.breaker.abandon();
        }
    }
}

/// Fails fast with `503` while open. Only `5xx` responses count as failures.
pub async fn circuit_breaker<B: Backend>(
    State(state): State<AppState<B>>,
    request: Request,
    next: Next,
) -> Response {
    if let Err(CircuitBreakerError::CircuitOpen { retry_after_secs }) =
        state.breaker.allow_request()
    {
        warn!("Circuit open, rejecting {} {}", request.method(), request.uri().path());
        state.metrics.breaker_rejected();
        return ApiError::circuit_open(retry_after_secs).into_response();
    }

    let admitted = Admitted {
        breaker: &state.breaker,
        settled: false,
    };
    let response = next.run(request).await;
    admitted.settle(response.status().is_server_error());

    state
        .metrics
        .breaker_state(state.breaker.state() == CircuitState::Open);
    response
}
