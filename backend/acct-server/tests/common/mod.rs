#![allow(dead_code)]

//! Test infrastructure for acct-server router tests

use acct_server::{AppState, build_router};
use acct_service::testing::{MemoryBackend, MemoryHarness};
use acct_service::{BreakerSettings, CircuitBreaker, ShutdownCoordinator, TokenBucketLimiter};

use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode, header::AUTHORIZATION},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

pub struct TestApp {
    pub harness: MemoryHarness,
    pub shutdown: ShutdownCoordinator,
    pub router: Router,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub json: Value,
}

pub struct TestAppBuilder {
    rate_limit: u32,
    breaker: BreakerSettings,
    auth_enabled: bool,
}

impl TestAppBuilder {
    pub fn rate_limit(mut self, limit: u32) -> Self {
        self.rate_limit = limit;
        self
    }

    pub fn breaker(mut self, settings: BreakerSettings) -> Self {
        self.breaker = settings;
        self
    }

    pub fn auth_enabled(mut self) -> Self {
        self.auth_enabled = true;
        self
    }

    pub fn build(self) -> TestApp {
        let harness = MemoryHarness::new();
        let shutdown = ShutdownCoordinator::new();

        // An hour-long period keeps the bucket from refilling during a test
        let limiter = TokenBucketLimiter::start(
            self.rate_limit,
            Duration::from_secs(3_600),
            shutdown.subscribe_guard(),
        );
        let state: AppState<MemoryBackend> = AppState::new(
            harness.user_service(),
            harness.auth_service(),
            harness.access_service(),
            limiter,
            CircuitBreaker::new(self.breaker),
        )
        .with_auth_enabled(self.auth_enabled);

        TestApp {
            router: build_router(state),
            harness,
            shutdown,
        }
    }
}

pub fn test_app() -> TestAppBuilder {
    TestAppBuilder {
        rate_limit: 10_000,
        breaker: BreakerSettings::default(),
        auth_enabled: false,
    }
}

impl TestApp {
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
        bearer: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = bearer {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            json,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send("GET", uri, None, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.send("POST", uri, Some(body), None).await
    }

    /// Create an account through the RPC surface, returning its ID
    pub async fn create_user(&self, name: &str, role: &str) -> i64 {
        let response = self.post("/api/v1/users", create_body(name, role)).await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.json);
        response.json["id"].as_i64().unwrap()
    }

    /// Log in and trade the refresh token for an access token
    pub async fn access_token_for(&self, name: &str) -> String {
        let login = self
            .post(
                "/api/v1/auth/login",
                json!({ "name": name, "password": PASSWORD }),
            )
            .await;
        assert_eq!(login.status, StatusCode::OK, "{}", login.json);

        let access = self
            .post(
                "/api/v1/auth/access",
                json!({ "refresh_token": login.json["refresh_token"] }),
            )
            .await;
        assert_eq!(access.status, StatusCode::OK, "{}", access.json);
        access.json["access_token"].as_str().unwrap().to_string()
    }
}

pub const PASSWORD: &str = "correct horse";

pub fn create_body(name: &str, role: &str) -> Value {
    json!({
        "name": name,
        "email": format!("{name}@example.com"),
        "password": PASSWORD,
        "password_confirm": PASSWORD,
        "role": role,
    })
}
