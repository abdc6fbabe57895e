pub mod api;
pub mod app_state;
pub mod error;
pub mod health;
pub mod logger;
pub mod middleware;
pub mod routes;

#[cfg(test)]
mod tests;

pub use api::{
    access::{CheckAccessRequest, check_access},
    auth::{
        auth::{access_token, login, refresh_token},
        login_request::LoginRequest,
        token_request::TokenRequest,
        token_responses::{AccessTokenResponse, RefreshTokenResponse},
    },
    empty_response::EmptyResponse,
    error::ApiError,
    error::Result as ApiResult,
    users::{
        check_users_exist_request::CheckUsersExistRequest,
        create_user_request::CreateUserRequest,
        create_user_response::CreateUserResponse,
        list_users_query::ListUsersQuery,
        update_user_request::UpdateUserRequest,
        user_dto::UserDto,
        user_list_response::UserListResponse,
        user_response::UserResponse,
        users::{check_users_exist, create_user, delete_user, get_user, list_users, update_user},
    },
};
pub use app_state::AppState;
pub use middleware::{
    access::authorize, admission::admission_control, breaker::circuit_breaker,
    request_logging::log_requests,
};

pub use crate::routes::build_router;
