//! Authorization check for external callers

use crate::{ApiResult, AppState, EmptyResponse};

use acct_service::Backend;

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, header::AUTHORIZATION},
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CheckAccessRequest {
    /// Permission key, e.g. `GET /api/v1/users/{id}`
    pub endpoint: String,
}

/// POST /api/v1/access/check
pub async fn check_access<B: Backend>(
    State(state): State<AppState<B>>,
    headers: HeaderMap,
    Json(req): Json<CheckAccessRequest>,
) -> ApiResult<Json<EmptyResponse>> {
    let authorization = headers.get(AUTHORIZATION).and_then(|h| h.to_str().ok());
    state.access.check(authorization, &req.endpoint).await?;
    Ok(Json(EmptyResponse {}))
}
