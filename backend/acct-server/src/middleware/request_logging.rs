use crate::AppState;

use acct_service::Backend;

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};
use log::info;

/// Logs and counts every RPC, labelled by route pattern rather than raw path.
pub async fn log_requests<B: Backend>(
    State(state): State<AppState<B>>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let route = match request.extensions().get::<MatchedPath>() {
        Some(matched) => matched.as_str().to_owned(),
        None => request.uri().path().to_owned(),
    };
    let rpc = format!("{} {}", request.method(), route);
    state.metrics.request_received(&rpc);

    let response = next.run(request).await;

    let elapsed = start.elapsed();
    let status = response.status().as_u16();
    state.metrics.response_sent(&rpc, status, elapsed);
    info!("{} {} ({}ms)", rpc, status, elapsed.as_millis());

    response
}
