//! RPC error boundary
//!
//! Every failure leaving a handler or interceptor passes through `ApiError`,
//! which picks the status code and renders a JSON body.

use acct_auth::AuthError;
use acct_core::CoreError;
use acct_service::ServiceError;

use std::panic::Location;

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use error_location::ErrorLocation;
use http::{HeaderValue, StatusCode, header::RETRY_AFTER};
use serde::Serialize;
use thiserror::Error;

/// JSON error response body
#[derive(Debug, Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    /// Machine-readable code, e.g. "NOT_FOUND"
    pub code: &'static str,
    pub message: String,
    /// Offending request field
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Account whose cache copy drifted from the store
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// 404
    #[error("Not found: {message} {location}")]
    NotFound {
        message: String,
        location: ErrorLocation,
    },

    /// 400
    #[error("Invalid argument: {message} {location}")]
    InvalidArgument {
        message: String,
        field: Option<String>,
        location: ErrorLocation,
    },

    /// 409
    #[error("Already exists: {message} {location}")]
    AlreadyExists {
        message: String,
        field: Option<String>,
        location: ErrorLocation,
    },

    /// 401
    #[error("Unauthenticated: {message} {location}")]
    Unauthenticated {
        message: String,
        location: ErrorLocation,
    },

    /// 403
    #[error("Permission denied: {message} {location}")]
    PermissionDenied {
        message: String,
        location: ErrorLocation,
    },

    /// 429
    #[error("Resource exhausted: {message} {location}")]
    ResourceExhausted {
        message: String,
        location: ErrorLocation,
    },

    /// 503
    #[error("Unavailable: {message} {location}")]
    Unavailable {
        message: String,
        retry_after_secs: Option<u64>,
        location: ErrorLocation,
    },

    /// 500
    #[error("Internal error: {message} {location}")]
    Internal {
        message: String,
        id: Option<i64>,
        location: ErrorLocation,
    },
}

impl ApiError {
    #[track_caller]
    pub fn rate_limited() -> Self {
        Self::ResourceExhausted {
            message: "too many requests".to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn circuit_open(retry_after_secs: u64) -> Self {
        Self::Unavailable {
            message: "service unavailable".to_string(),
            retry_after_secs: Some(retry_after_secs),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::InvalidArgument { .. } => StatusCode::BAD_REQUEST,
            Self::AlreadyExists { .. } => StatusCode::CONFLICT,
            Self::Unauthenticated { .. } => StatusCode::UNAUTHORIZED,
            Self::PermissionDenied { .. } => StatusCode::FORBIDDEN,
            Self::ResourceExhausted { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::InvalidArgument { .. } => "INVALID_ARGUMENT",
            Self::AlreadyExists { .. } => "ALREADY_EXISTS",
            Self::Unauthenticated { .. } => "UNAUTHENTICATED",
            Self::PermissionDenied { .. } => "PERMISSION_DENIED",
            Self::ResourceExhausted { .. } => "RESOURCE_EXHAUSTED",
            Self::Unavailable { .. } => "UNAVAILABLE",
            Self::Internal { .. } => "INTERNAL",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("{}", self);
        } else {
            log::debug!("{}", self);
        }

        let code = self.code();
        let mut retry_after = None;
        let body = match self {
            ApiError::InvalidArgument { message, field, .. }
            | ApiError::AlreadyExists { message, field, .. } => ApiErrorBody {
                code,
                message,
                field,
                id: None,
            },
            ApiError::Internal { message, id, .. } => ApiErrorBody {
                code,
                message,
                field: None,
                id,
            },
            ApiError::Unavailable {
                message,
                retry_after_secs,
                ..
            } => {
                retry_after = retry_after_secs;
                ApiErrorBody {
                    code,
                    message,
                    field: None,
                    id: None,
                }
            }
            ApiError::NotFound { message, .. }
            | ApiError::Unauthenticated { message, .. }
            | ApiError::PermissionDenied { message, .. }
            | ApiError::ResourceExhausted { message, .. } => ApiErrorBody {
                code,
                message,
                field: None,
                id: None,
            },
        };

        let mut response = (status, Json(ApiErrorResponse { error: body })).into_response();
        if let Some(secs) = retry_after {
            response
                .headers_mut()
                .insert(RETRY_AFTER, HeaderValue::from(secs));
        }
        response
    }
}

fn describe_auth_failure(e: &AuthError) -> &'static str {
    match e {
        AuthError::MissingHeader { .. } => "missing authorization header",
        AuthError::InvalidScheme { .. } => "authorization scheme must be Bearer",
        AuthError::TokenExpired { .. } => "token expired",
        AuthError::InvalidCredential { .. } => "invalid name or password",
        _ => "invalid token",
    }
}

impl From<ServiceError> for ApiError {
    #[track_caller]
    fn from(e: ServiceError) -> Self {
        let location = ErrorLocation::from(Location::caller());
        if e.is_desync() {
            log::error!("{e}");
        }

        match e {
            ServiceError::NotFound {
                entity, identifier, ..
            } => ApiError::NotFound {
                message: format!("{entity} {identifier} not found"),
                location,
            },
            ServiceError::InvalidInput { field, message, .. } => ApiError::InvalidArgument {
                message,
                field: Some(field.to_string()),
                location,
            },
            ServiceError::AlreadyExists { field, .. } => ApiError::AlreadyExists {
                message: format!("a user with this {field} already exists"),
                field: Some(field.to_string()),
                location,
            },
            ServiceError::InvalidCredential { .. } => ApiError::Unauthenticated {
                message: "invalid name or password".to_string(),
                location,
            },
            ServiceError::Unauthenticated { source } => ApiError::Unauthenticated {
                message: describe_auth_failure(&source).to_string(),
                location,
            },
            ServiceError::Forbidden { endpoint, role, .. } => ApiError::PermissionDenied {
                message: format!("role {role} may not call {endpoint}"),
                location,
            },
            ServiceError::CacheDesync { id, operation, .. } => ApiError::Internal {
                message: format!("user {id} was saved but the cache {operation} failed"),
                id: Some(id),
                location,
            },
            other => {
                // Store, cache and signing failures stay server-side
                log::error!("Service failure: {other}");
                ApiError::Internal {
                    message: "internal error".to_string(),
                    id: None,
                    location,
                }
            }
        }
    }
}

impl From<CoreError> for ApiError {
    #[track_caller]
    fn from(e: CoreError) -> Self {
        ServiceError::from(e).into()
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
