//! Token RPC handlers

use crate::{
    AccessTokenResponse, ApiResult, AppState, LoginRequest, RefreshTokenResponse, TokenRequest,
};

use acct_service::Backend;

use axum::{Json, extract::State};

/// POST /api/v1/auth/login
pub async fn login<B: Backend>(
    State(state): State<AppState<B>>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<RefreshTokenResponse>> {
    let refresh_token = state.auth.login(&req.name, &req.password).await?;
    Ok(Json(RefreshTokenResponse { refresh_token }))
}

/// POST /api/v1/auth/refresh
pub async fn refresh_token<B: Backend>(
    State(state): State<AppState<B>>,
    Json(req): Json<TokenRequest>,
) -> ApiResult<Json<RefreshTokenResponse>> {
    let refresh_token = state.auth.refresh_token(&req.refresh_token)?;
    Ok(Json(RefreshTokenResponse { refresh_token }))
}

/// POST /api/v1/auth/access
pub async fn access_token<B: Backend>(
    State(state): State<AppState<B>>,
    Json(req): Json<TokenRequest>,
) -> ApiResult<Json<AccessTokenResponse>> {
    let access_token = state.auth.access_token(&req.refresh_token)?;
    Ok(Json(AccessTokenResponse { access_token }))
}
