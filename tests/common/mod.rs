#![allow(dead_code)]

use axum_test::TestServer;
use chrono::Duration;
use linfy::infrastructure::persistence::MemoryStore;
use linfy::infrastructure::security::SessionTokens;
use linfy::routes::{RouterOptions, app_router};
use linfy::state::AppState;
use serde_json::json;
use std::sync::Arc;

pub const TEST_SECRET: &str = "test-jwt-secret";
pub const BASE_URL: &str = "http://localhost:3000/api";
pub const PASSWORD: &str = "correct horse battery";

pub fn test_tokens() -> Arc<SessionTokens> {
    Arc::new(SessionTokens::new(TEST_SECRET, Duration::days(7)))
}

pub fn create_test_state() -> AppState {
    AppState::in_memory(Arc::new(MemoryStore::new()), test_tokens(), BASE_URL)
}

pub fn create_test_server() -> TestServer {
    server_for(create_test_state())
}

pub fn server_for(state: AppState) -> TestServer {
    server_with_options(state, &RouterOptions::default())
}

pub fn server_with_options(state: AppState, options: &RouterOptions) -> TestServer {
    TestServer::new(app_router(state, options)).unwrap()
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

/// Registers `email` with [`PASSWORD`] and returns a session token.
pub async fn register_and_login(server: &TestServer, email: &str) -> String {
    server
        .post("/api/auth/register")
        .json(&json!({ "name": "Test User", "email": email, "password": PASSWORD }))
        .await
        .assert_status(axum::http::StatusCode::CREATED);

    let response = server
        .post("/api/auth/login")
        .json(&json!({ "email": email, "password": PASSWORD }))
        .await;
    response.assert_status_ok();

    response.json::<serde_json::Value>()["token"]
        .as_str()
        .unwrap()
        .to_string()
}

/// Shortens `url` as the holder of `token` and returns the `data` object.
pub async fn shorten(server: &TestServer, token: &str, url: &str) -> serde_json::Value {
    let response = server
        .post("/api/shorten")
        .add_header("Authorization", bearer(token))
        .json(&json!({ "originalUrl": url }))
        .await;
    response.assert_status_ok();

    response.json::<serde_json::Value>()["data"].clone()
}

pub async fn metrics(server: &TestServer) -> serde_json::Value {
    let response = server.get("/api/metrics").await;
    response.assert_status_ok();
    response.json::<serde_json::Value>()
}
