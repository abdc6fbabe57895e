//! Router tests for the account RPCs
mod common;

use crate::common::{PASSWORD, create_body, test_app};

use acct_service::testing::Faults;

use axum::http::StatusCode;
use googletest::prelude::*;
use serde_json::json;

#[tokio::test]
async fn given_valid_request_when_create_then_201_and_user_readable() {
    // Given
    let app = test_app().build();

    // When
    let created = app.post("/api/v1/users", create_body("bob", "USER")).await;

    // Then
    assert_that!(created.status, eq(StatusCode::CREATED));
    assert_that!(created.json["id"].as_i64(), some(eq(1)));

    let fetched = app.get("/api/v1/users/1").await;
    assert_that!(fetched.status, eq(StatusCode::OK));
    assert_that!(fetched.json["user"]["name"].as_str(), some(eq("bob")));
    assert_that!(fetched.json["user"]["role"].as_str(), some(eq("USER")));
    assert!(fetched.json["user"].get("password").is_none());
}

#[tokio::test]
async fn given_mismatched_confirmation_when_create_then_400_on_password_confirm() {
    // Given
    let app = test_app().build();
    let mut body = create_body("bob", "USER");
    body["password_confirm"] = json!("something else");

    // When
    let response = app.post("/api/v1/users", body).await;

    // Then
    assert_that!(response.status, eq(StatusCode::BAD_REQUEST));
    assert_that!(response.json["error"]["code"].as_str(), some(eq("INVALID_ARGUMENT")));
    assert_that!(response.json["error"]["field"].as_str(), some(eq("password_confirm")));
    assert!(app.harness.stored_user(1).is_none());
}

#[tokio::test]
async fn given_malformed_email_when_create_then_400_on_email() {
    // Given
    let app = test_app().build();
    let mut body = create_body("bob", "USER");
    body["email"] = json!("bob.example.com");

    // When
    let response = app.post("/api/v1/users", body).await;

    // Then
    assert_that!(response.status, eq(StatusCode::BAD_REQUEST));
    assert_that!(response.json["error"]["field"].as_str(), some(eq("email")));
}

#[tokio::test]
async fn given_unknown_role_when_create_then_400_on_role() {
    // Given
    let app = test_app().build();

    // When
    let response = app.post("/api/v1/users", create_body("bob", "ROOT")).await;

    // Then
    assert_that!(response.status, eq(StatusCode::BAD_REQUEST));
    assert_that!(response.json["error"]["field"].as_str(), some(eq("role")));
}

#[tokio::test]
async fn given_taken_name_when_create_then_409() {
    // Given
    let app = test_app().build();
    app.create_user("bob", "USER").await;

    // When
    let response = app.post("/api/v1/users", create_body("bob", "USER")).await;

    // Then
    assert_that!(response.status, eq(StatusCode::CONFLICT));
    assert_that!(response.json["error"]["code"].as_str(), some(eq("ALREADY_EXISTS")));
}

#[tokio::test]
async fn given_cache_write_failure_when_create_then_500_with_committed_id() {
    // Given
    let app = test_app().build();
    Faults::set(&app.harness.faults.cache_writes, true);

    // When
    let response = app.post("/api/v1/users", create_body("bob", "USER")).await;

    // Then
    assert_that!(response.status, eq(StatusCode::INTERNAL_SERVER_ERROR));
    assert_that!(response.json["error"]["id"].as_i64(), some(eq(1)));
    assert!(app.harness.stored_user(1).is_some());
}

#[tokio::test]
async fn given_missing_user_when_get_then_404() {
    // Given
    let app = test_app().build();

    // When
    let response = app.get("/api/v1/users/42").await;

    // Then
    assert_that!(response.status, eq(StatusCode::NOT_FOUND));
    assert_that!(response.json["error"]["code"].as_str(), some(eq("NOT_FOUND")));
}

#[tokio::test]
async fn given_cache_unreachable_when_get_then_served_from_store() {
    // Given
    let app = test_app().build();
    app.create_user("bob", "USER").await;
    Faults::set(&app.harness.faults.cache_reads, true);

    // When
    let response = app.get("/api/v1/users/1").await;

    // Then
    assert_that!(response.status, eq(StatusCode::OK));
    assert_that!(response.json["user"]["email"].as_str(), some(eq("bob@example.com")));
}

#[tokio::test]
async fn given_partial_patch_when_update_then_only_named_fields_change() {
    // Given
    let app = test_app().build();
    app.create_user("bob", "USER").await;

    // When
    let response = app
        .send(
            "PATCH",
            "/api/v1/users/1",
            Some(json!({ "role": "ADMIN" })),
            None,
        )
        .await;

    // Then
    assert_that!(response.status, eq(StatusCode::OK));
    let fetched = app.get("/api/v1/users/1").await;
    assert_that!(fetched.json["user"]["role"].as_str(), some(eq("ADMIN")));
    assert_that!(fetched.json["user"]["name"].as_str(), some(eq("bob")));
}

#[tokio::test]
async fn given_blank_fields_when_update_then_existing_values_kept() {
    // Given
    let app = test_app().build();
    app.create_user("alice", "USER").await;

    // When
    let response = app
        .send(
            "PATCH",
            "/api/v1/users/1",
            Some(json!({ "name": "", "email": "", "role": "" })),
            None,
        )
        .await;

    // Then
    assert_that!(response.status, eq(StatusCode::OK));
    let stored = app.harness.stored_user(1).unwrap();
    assert_that!(stored.name, eq("alice"));
    assert_that!(stored.email, eq("alice@example.com"));
    let fetched = app.get("/api/v1/users/1").await;
    assert_that!(fetched.json["user"]["name"].as_str(), some(eq("alice")));
}

#[tokio::test]
async fn given_unknown_role_when_update_then_400_and_user_unchanged() {
    // Given
    let app = test_app().build();
    app.create_user("bob", "USER").await;

    // When
    let response = app
        .send(
            "PATCH",
            "/api/v1/users/1",
            Some(json!({ "role": "OWNER" })),
            None,
        )
        .await;

    // Then
    assert_that!(response.status, eq(StatusCode::BAD_REQUEST));
    assert_that!(response.json["error"]["field"].as_str(), some(eq("role")));
    let fetched = app.get("/api/v1/users/1").await;
    assert_that!(fetched.json["user"]["role"].as_str(), some(eq("USER")));
}

#[tokio::test]
async fn given_existing_user_when_delete_then_gone() {
    // Given
    let app = test_app().build();
    app.create_user("bob", "USER").await;

    // When
    let response = app.send("DELETE", "/api/v1/users/1", None, None).await;

    // Then
    assert_that!(response.status, eq(StatusCode::OK));
    assert_that!(app.get("/api/v1/users/1").await.status, eq(StatusCode::NOT_FOUND));
    assert!(!app.harness.cache.contains(1));
}

#[tokio::test]
async fn given_missing_user_when_delete_then_404() {
    // Given
    let app = test_app().build();

    // When
    let response = app.send("DELETE", "/api/v1/users/7", None, None).await;

    // Then
    assert_that!(response.status, eq(StatusCode::NOT_FOUND));
}

#[tokio::test]
async fn given_three_users_when_list_with_limit_then_page_returned() {
    // Given
    let app = test_app().build();
    for name in ["ann", "bob", "cat"] {
        app.create_user(name, "USER").await;
    }

    // When
    let response = app.get("/api/v1/users?limit=2&offset=1").await;

    // Then
    assert_that!(response.status, eq(StatusCode::OK));
    let users = response.json["users"].as_array().unwrap();
    assert_that!(users.len(), eq(2));
    assert_that!(users[0]["name"].as_str(), some(eq("bob")));
    assert_that!(users[1]["name"].as_str(), some(eq("cat")));
}

#[tokio::test]
async fn given_one_missing_id_when_check_users_exist_then_404() {
    // Given
    let app = test_app().build();
    app.create_user("bob", "USER").await;

    // When
    let present = app
        .post("/api/v1/users/exists", json!({ "ids": [1] }))
        .await;
    let missing = app
        .post("/api/v1/users/exists", json!({ "ids": [1, 99] }))
        .await;
    let empty = app.post("/api/v1/users/exists", json!({ "ids": [] })).await;

    // Then
    assert_that!(present.status, eq(StatusCode::OK));
    assert_that!(missing.status, eq(StatusCode::NOT_FOUND));
    assert_that!(empty.status, eq(StatusCode::BAD_REQUEST));
}

#[tokio::test]
async fn given_created_user_when_login_then_refresh_token_returned() {
    // Given
    let app = test_app().build();
    app.create_user("bob", "USER").await;

    // When
    let ok = app
        .post(
            "/api/v1/auth/login",
            json!({ "name": "bob", "password": PASSWORD }),
        )
        .await;
    let wrong = app
        .post(
            "/api/v1/auth/login",
            json!({ "name": "bob", "password": "not the password" }),
        )
        .await;

    // Then
    assert_that!(ok.status, eq(StatusCode::OK));
    assert!(ok.json["refresh_token"].is_string());
    assert_that!(wrong.status, eq(StatusCode::UNAUTHORIZED));
}
