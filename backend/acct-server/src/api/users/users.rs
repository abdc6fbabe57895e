//! User RPC handlers

use crate::{
    ApiResult, AppState, CheckUsersExistRequest, CreateUserRequest, CreateUserResponse,
    EmptyResponse, ListUsersQuery, UpdateUserRequest, UserDto, UserListResponse, UserResponse,
};

use acct_core::{NewUser, Role, UserPatch, validate_email, validate_password};
use acct_service::Backend;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use log::warn;

/// POST /api/v1/users
pub async fn create_user<B: Backend>(
    State(state): State<AppState<B>>,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<CreateUserResponse>)> {
    let password = validate_password(&req.password, &req.password_confirm)?;
    validate_email(&req.email)?;
    let role = Role::from_stored(req.role.as_deref())?;

    let user = NewUser::new(req.name, req.email, role).with_password(password);
    let id = state.users.create(user).await?.into_result()?;

    Ok((StatusCode::CREATED, Json(CreateUserResponse { id })))
}

/// GET /api/v1/users/{id}
///
/// A failed cache repopulation is logged; the stored user is still returned.
pub async fn get_user<B: Backend>(
    State(state): State<AppState<B>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<UserResponse>> {
    let outcome = state.users.get(id).await?;
    if let Some(desync) = &outcome.desync {
        warn!("Serving user {id} from the store: {desync}");
    }

    Ok(Json(UserResponse {
        user: outcome.value.into(),
    }))
}

/// PATCH /api/v1/users/{id}
pub async fn update_user<B: Backend>(
    State(state): State<AppState<B>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult<Json<EmptyResponse>> {
    let mut patch = UserPatch::new(id);
    if let Some(name) = req.name {
        patch = patch.name(name);
    }
    if let Some(email) = req.email.filter(|email| !email.is_empty()) {
        validate_email(&email)?;
        patch = patch.email(email);
    }
    if let Some(role) = req.role.as_deref().filter(|role| !role.is_empty()) {
        patch = patch.role(role.parse::<Role>()?);
    }

    state.users.update(patch).await?.into_result()?;
    Ok(Json(EmptyResponse {}))
}

/// DELETE /api/v1/users/{id}
pub async fn delete_user<B: Backend>(
    State(state): State<AppState<B>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<EmptyResponse>> {
    state.users.delete(id).await?.into_result()?;
    Ok(Json(EmptyResponse {}))
}

/// GET /api/v1/users
pub async fn list_users<B: Backend>(
    State(state): State<AppState<B>>,
    Query(query): Query<ListUsersQuery>,
) -> ApiResult<Json<UserListResponse>> {
    let users = state
        .users
        .list(query.limit.unwrap_or(0), query.offset.unwrap_or(0))
        .await?;

    Ok(Json(UserListResponse {
        users: users.into_iter().map(UserDto::from).collect(),
    }))
}

/// POST /api/v1/users/exists
pub async fn check_users_exist<B: Backend>(
    State(state): State<AppState<B>>,
    Json(req): Json<CheckUsersExistRequest>,
) -> ApiResult<Json<EmptyResponse>> {
    state.users.check_users_exist(&req.ids).await?;
    Ok(Json(EmptyResponse {}))
}
