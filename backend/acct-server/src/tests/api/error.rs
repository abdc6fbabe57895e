use crate::ApiError;

use acct_auth::AuthError;
use acct_cache::CacheError;
use acct_core::{ErrorLocation, Role};
use acct_db::DbError;
use acct_service::{CacheOperation, ServiceError};

use std::panic::Location;

use axum::response::{IntoResponse, Response};
use http::StatusCode;
use http::header::RETRY_AFTER;
use http_body_util::BodyExt;

async fn body_json(response: Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

fn here() -> ErrorLocation {
    ErrorLocation::from(Location::caller())
}

#[tokio::test]
async fn test_not_found_returns_404_with_json_body() {
    let error = ApiError::from(ServiceError::from(DbError::not_found("user", "ID 3")));
    let response = error.into_response();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "NOT_FOUND");
    assert_eq!(json["error"]["message"], "user ID 3 not found");
}

#[tokio::test]
async fn test_invalid_input_returns_400_with_field() {
    let error = ApiError::from(ServiceError::invalid_input("ids", "at least one ID required"));
    let response = error.into_response();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "INVALID_ARGUMENT");
    assert_eq!(json["error"]["field"], "ids");
}

#[tokio::test]
async fn test_unique_violation_returns_409() {
    let error = ApiError::from(ServiceError::AlreadyExists {
        field: "email",
        location: here(),
    });
    let response = error.into_response();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["error"]["field"], "email");
}

#[tokio::test]
async fn test_expired_token_returns_401_without_location() {
    let error = ApiError::from(ServiceError::from(AuthError::TokenExpired {
        location: here(),
    }));
    let response = error.into_response();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"]["message"], "token expired");
}

#[tokio::test]
async fn test_forbidden_returns_403() {
    let error = ApiError::from(ServiceError::Forbidden {
        endpoint: "DELETE /api/v1/users/{id}".to_string(),
        role: Role::User,
        location: here(),
    });

    assert_eq!(error.into_response().status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_cache_desync_returns_500_with_id() {
    let desync = ServiceError::cache_desync(
        12,
        CacheOperation::Update,
        CacheError::Timeout {
            operation: "update",
            location: here(),
        },
    );
    let response = ApiError::from(desync).into_response();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "INTERNAL");
    assert_eq!(json["error"]["id"], 12);
}

#[tokio::test]
async fn test_store_failure_hides_details() {
    let error = ApiError::from(ServiceError::from(CacheError::Timeout {
        operation: "get",
        location: here(),
    }));
    let response = error.into_response();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["error"]["message"], "internal error");
    assert!(json["error"].get("id").is_none());
}

#[tokio::test]
async fn test_circuit_open_returns_503_with_retry_after() {
    let response = ApiError::circuit_open(7).into_response();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.headers()[RETRY_AFTER], "7");
}

#[tokio::test]
async fn test_rate_limited_returns_429() {
    let response = ApiError::rate_limited().into_response();

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "RESOURCE_EXHAUSTED");
}
