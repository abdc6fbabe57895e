use crate::{ApiError, AppState};

use acct_service::Backend;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Token-bucket gate. Never waits: no token means `429` immediately.
pub async fn admission_control<B: Backend>(
    State(state): State<AppState<B>>,
    request: Request,
    next: Next,
) -> Response {
    if !state.limiter.allow() {
        state.metrics.admission_rejected();
        return ApiError::rate_limited().into_response();
    }

    next.run(request).await
}
