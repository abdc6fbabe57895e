use crate::AppState;

use acct_service::{Backend, CircuitState};

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// GET /health - component status
pub async fn health_check<B: Backend>(State(state): State<AppState<B>>) -> Response {
    let breaker = match state.breaker.state() {
        CircuitState::Closed => "closed",
        CircuitState::Open => "open",
        CircuitState::HalfOpen => "half_open",
    };

    let health = json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "components": {
            "circuit_breaker": breaker,
            "admission_tokens": state.limiter.available(),
            "auth": if state.auth_enabled { "enabled" } else { "disabled" },
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (StatusCode::OK, Json(health)).into_response()
}

/// GET /live - liveness check
pub async fn liveness_check() -> Response {
    (StatusCode::OK, "OK").into_response()
}

/// GET /ready - readiness check; not ready while the circuit is open
pub async fn readiness_check<B: Backend>(State(state): State<AppState<B>>) -> Response {
    if state.breaker.state() == CircuitState::Open {
        return (StatusCode::SERVICE_UNAVAILABLE, "Circuit open").into_response();
    }
    (StatusCode::OK, "Ready").into_response()
}

/// GET /metrics - Prometheus text format
pub async fn render_metrics<B: Backend>(State(state): State<AppState<B>>) -> Response {
    match &state.prometheus {
        Some(handle) => (StatusCode::OK, handle.render()).into_response(),
        None => (StatusCode::NOT_FOUND, "Metrics recorder not installed").into_response(),
    }
}
