use crate::{ApiError, AppState};

use acct_service::Backend;

use axum::{
    extract::{MatchedPath, Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Requires a Bearer access token whose role is granted `"<METHOD> <route>"`.
/// The verified claims are handed to the handler as a request extension.
pub async fn authorize<B: Backend>(
    State(state): State<AppState<B>>,
    matched: MatchedPath,
    mut request: Request,
    next: Next,
) -> Response {
    let endpoint = format!("{} {}", request.method(), matched.as_str());
    let authorization = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(str::to_owned);

    match state.access.check(authorization.as_deref(), &endpoint).await {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}
