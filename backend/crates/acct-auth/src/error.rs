use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid token: {message} {location}")]
    InvalidToken {
        message: String,
        location: ErrorLocation,
    },

    #[error("Token expired {location}")]
    TokenExpired { location: ErrorLocation },

    #[error("Missing authorization header {location}")]
    MissingHeader { location: ErrorLocation },

    #[error("Invalid authorization scheme: expected 'Bearer' {location}")]
    InvalidScheme { location: ErrorLocation },

    #[error("JWT decode failed: {source} {location}")]
    JwtDecode {
        #[source]
        source: jsonwebtoken::errors::Error,
        location: ErrorLocation,
    },

    #[error("JWT encode failed: {source} {location}")]
    JwtEncode {
        #[source]
        source: jsonwebtoken::errors::Error,
        location: ErrorLocation,
    },

    #[error("Invalid claim '{claim}': {message} {location}")]
    InvalidClaim {
        claim: String,
        message: String,
        location: ErrorLocation,
    },

    #[error("Invalid credentials {location}")]
    InvalidCredential { location: ErrorLocation },

    #[error("Password hashing failed: {message} {location}")]
    Hashing {
        message: String,
        location: ErrorLocation,
    },
}

impl AuthError {
    /// Machine-readable code used in RPC error bodies
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidToken { .. } => "INVALID_TOKEN",
            Self::TokenExpired { .. } => "TOKEN_EXPIRED",
            Self::MissingHeader { .. } => "MISSING_AUTH_HEADER",
            Self::InvalidScheme { .. } => "INVALID_AUTH_SCHEME",
            Self::JwtDecode { .. } => "INVALID_TOKEN",
            Self::JwtEncode { .. } => "INTERNAL_ERROR",
            Self::InvalidClaim { .. } => "INVALID_CLAIM",
            Self::InvalidCredential { .. } => "INVALID_CREDENTIAL",
            Self::Hashing { .. } => "INTERNAL_ERROR",
        }
    }

    /// True for failures caused by the caller's credentials rather than by this service.
    pub fn is_unauthenticated(&self) -> bool {
        !matches!(self, Self::JwtEncode { .. } | Self::Hashing { .. })
    }
}

pub type Result<T> = std::result::Result<T, AuthError>;
