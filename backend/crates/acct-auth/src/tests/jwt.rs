use crate::{AuthError, Claims, TokenKind, TokenManager};

use acct_core::Role;

use chrono::Duration;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};

const SECRET: &[u8] = b"test-secret-key-at-least-32-bytes";

fn manager(secret: &[u8]) -> TokenManager {
    TokenManager::with_hs256(secret, Duration::minutes(5), Duration::minutes(60))
}

#[test]
fn given_issued_access_token_when_verified_then_returns_claims() {
    // Given
    let tokens = manager(SECRET);
    let token = tokens.issue("bob", Role::User, TokenKind::Access).unwrap();

    // When
    let claims = tokens.verify(&token, TokenKind::Access).unwrap();

    // Then
    assert_eq!(claims.sub, "bob");
    assert_eq!(claims.role, Role::User);
    assert_eq!(claims.kind, TokenKind::Access);
    assert!(claims.exp > claims.iat);
}

#[test]
fn given_refresh_token_when_verified_as_access_then_invalid_token() {
    // Given
    let tokens = manager(SECRET);
    let token = tokens.issue("bob", Role::Admin, TokenKind::Refresh).unwrap();

    // When
    let result = tokens.verify(&token, TokenKind::Access);

    // Then
    assert!(matches!(result, Err(AuthError::InvalidToken { .. })));
}

#[test]
fn given_expired_token_when_verified_then_token_expired() {
    // Given
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: "bob".to_string(),
        role: Role::User,
        kind: TokenKind::Access,
        exp: now - 3600,
        iat: now - 7200,
    };
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(SECRET),
    )
    .unwrap();

    // When
    let result = manager(SECRET).verify(&token, TokenKind::Access);

    // Then
    assert!(matches!(result, Err(AuthError::TokenExpired { .. })));
}

#[test]
fn given_wrong_secret_when_verified_then_decode_error() {
    // Given
    let token = manager(SECRET)
        .issue("bob", Role::User, TokenKind::Access)
        .unwrap();

    // When
    let result = manager(b"another-secret-key-of-32-bytes!!").verify(&token, TokenKind::Access);

    // Then
    assert!(matches!(result, Err(AuthError::JwtDecode { .. })));
}

#[test]
fn given_garbage_token_when_verified_then_decode_error() {
    let result = manager(SECRET).verify("not-a-jwt", TokenKind::Access);

    assert!(matches!(result, Err(AuthError::JwtDecode { .. })));
}
