use crate::{
    AppState, access_token, admission_control, authorize, check_access, check_users_exist,
    circuit_breaker, create_user, delete_user, get_user, health, list_users, log_requests, login,
    refresh_token, update_user,
};

use acct_service::Backend;

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

/// Build the application router.
///
/// Every `/api/v1` route runs behind request logging, admission control and
/// the circuit breaker. Account routes other than Create also pass the access
/// check when auth is enabled. Probes and metrics bypass the interceptors.
pub fn build_router<B: Backend>(state: AppState<B>) -> Router {
    let mut protected = Router::new()
        .route("/api/v1/users", get(list_users::<B>))
        .route(
            "/api/v1/users/{id}",
            get(get_user::<B>)
                .patch(update_user::<B>)
                .delete(delete_user::<B>),
        )
        .route("/api/v1/users/exists", post(check_users_exist::<B>));
    if state.auth_enabled {
        protected = protected.route_layer(from_fn_with_state(state.clone(), authorize::<B>));
    }

    let api = Router::new()
        .route("/api/v1/users", post(create_user::<B>))
        .route("/api/v1/auth/login", post(login::<B>))
        .route("/api/v1/auth/refresh", post(refresh_token::<B>))
        .route("/api/v1/auth/access", post(access_token::<B>))
        .route("/api/v1/access/check", post(check_access::<B>))
        .merge(protected)
        .layer(
            ServiceBuilder::new()
                .layer(from_fn_with_state(state.clone(), log_requests::<B>))
                .layer(from_fn_with_state(state.clone(), admission_control::<B>))
                .layer(from_fn_with_state(state.clone(), circuit_breaker::<B>)),
        );

    Router::new()
        .route("/health", get(health::health_check::<B>))
        .route("/live", get(health::liveness_check))
        .route("/ready", get(health::readiness_check::<B>))
        .route("/metrics", get(health::render_metrics::<B>))
        .merge(api)
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
