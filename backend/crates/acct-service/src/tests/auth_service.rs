use crate::ServiceError;
use crate::testing::MemoryHarness;

use acct_auth::TokenKind;
use acct_core::{NewUser, Password, Role};

use googletest::prelude::*;

async fn harness_with_account() -> MemoryHarness {
    let harness = MemoryHarness::new();
    let user = NewUser::new("carol", "carol@example.com", Role::Admin)
        .with_password(Password::new("correct horse").unwrap());
    harness.user_service().create(user).await.unwrap();
    harness
}

#[tokio::test]
async fn given_correct_password_when_login_then_refresh_token_for_account() {
    // Given
    let harness = harness_with_account().await;
    let auth = harness.auth_service();

    // When
    let token = auth.login("carol", "correct horse").await.unwrap();

    // Then
    let claims = harness.tokens.verify(&token, TokenKind::Refresh).unwrap();
    assert_that!(claims.sub, eq("carol"));
    assert_that!(claims.role, eq(Role::Admin));
}

#[tokio::test]
async fn given_wrong_password_when_login_then_invalid_credential() {
    // Given
    let harness = harness_with_account().await;
    let auth = harness.auth_service();

    // When
    let result = auth.login("carol", "battery staple").await;

    // Then
    assert!(matches!(result, Err(ServiceError::InvalidCredential { .. })));
}

#[tokio::test]
async fn given_unknown_name_when_login_then_invalid_credential() {
    // Given
    let harness = MemoryHarness::new();
    let auth = harness.auth_service();

    // When
    let result = auth.login("nobody", "whatever1").await;

    // Then
    assert!(matches!(result, Err(ServiceError::InvalidCredential { .. })));
}

#[tokio::test]
async fn given_account_without_password_when_login_then_invalid_credential() {
    // Given
    let harness = MemoryHarness::new();
    harness
        .user_service()
        .create(NewUser::new("dave", "dave@example.com", Role::User))
        .await
        .unwrap();
    let auth = harness.auth_service();

    // When
    let result = auth.login("dave", "anything1").await;

    // Then
    assert!(matches!(result, Err(ServiceError::InvalidCredential { .. })));
}

#[test]
fn given_refresh_token_when_access_token_requested_then_access_kind_issued() {
    // Given
    let harness = MemoryHarness::new();
    let auth = harness.auth_service();
    let refresh = harness
        .tokens
        .issue("erin", Role::User, TokenKind::Refresh)
        .unwrap();

    // When
    let access = auth.access_token(&refresh).unwrap();

    // Then
    let claims = harness.tokens.verify(&access, TokenKind::Access).unwrap();
    assert_that!(claims.sub, eq("erin"));
}

#[test]
fn given_access_token_when_refresh_requested_then_unauthenticated() {
    // Given
    let harness = MemoryHarness::new();
    let auth = harness.auth_service();
    let access = harness
        .tokens
        .issue("erin", Role::User, TokenKind::Access)
        .unwrap();

    // When
    let result = auth.refresh_token(&access);

    // Then
    assert!(matches!(result, Err(ServiceError::Unauthenticated { .. })));
}

#[test]
fn given_refresh_token_when_refreshed_then_new_refresh_token_keeps_role() {
    // Given
    let harness = MemoryHarness::new();
    let auth = harness.auth_service();
    let refresh = harness
        .tokens
        .issue("erin", Role::Admin, TokenKind::Refresh)
        .unwrap();

    // When
    let renewed = auth.refresh_token(&refresh).unwrap();

    // Then
    let claims = harness.tokens.verify(&renewed, TokenKind::Refresh).unwrap();
    assert_that!(claims.role, eq(Role::Admin));
}

#[test]
fn given_garbage_token_when_access_token_requested_then_unauthenticated() {
    // Given
    let harness = MemoryHarness::new();
    let auth = harness.auth_service();

    // When
    let result = auth.access_token("not.a.jwt");

    // Then
    assert!(matches!(result, Err(ServiceError::Unauthenticated { .. })));
}
