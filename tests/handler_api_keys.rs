mod common;

use axum::http::StatusCode;
use serde_json::json;

async fn create_key(server: &axum_test::TestServer, token: &str) -> serde_json::Value {
    let response = server
        .post("/api/auth/api-keys")
        .add_header("Authorization", common::bearer(token))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<serde_json::Value>()
}

async fn list_keys(server: &axum_test::TestServer, token: &str) -> Vec<serde_json::Value> {
    let response = server
        .get("/api/auth/api-keys")
        .add_header("Authorization", common::bearer(token))
        .await;
    response.assert_status_ok();
    response.json::<serde_json::Value>()["apiKeys"]
        .as_array()
        .unwrap()
        .clone()
}

#[tokio::test]
async fn test_create_api_key() {
    let server = common::create_test_server();
    let token = common::register_and_login(&server, "ada@example.com").await;

    let json = create_key(&server, &token).await;

    let key = json["apiKey"].as_str().unwrap();
    assert_eq!(key.len(), 64);
    assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
    assert!(json["keyId"].is_i64());
    assert!(json["createdAt"].is_string());
}

#[tokio::test]
async fn test_list_hides_secret() {
    let server = common::create_test_server();
    let token = common::register_and_login(&server, "ada@example.com").await;
    create_key(&server, &token).await;

    let keys = list_keys(&server, &token).await;

    assert_eq!(keys.len(), 1);
    assert!(keys[0].get("apiKey").is_none());
    assert!(keys[0]["keyId"].is_i64());
    assert!(keys[0]["lastUsed"].is_null());
}

#[tokio::test]
async fn test_sixth_key_is_rejected() {
    let server = common::create_test_server();
    let token = common::register_and_login(&server, "ada@example.com").await;

    for _ in 0..5 {
        create_key(&server, &token).await;
    }

    let response = server
        .post("/api/auth/api-keys")
        .add_header("Authorization", common::bearer(&token))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(
        response.json::<serde_json::Value>()["error"]["message"],
        "Maximum 5 API keys allowed"
    );
    assert_eq!(list_keys(&server, &token).await.len(), 5);
}

#[tokio::test]
async fn test_revoke_api_key() {
    let server = common::create_test_server();
    let token = common::register_and_login(&server, "ada@example.com").await;
    let created = create_key(&server, &token).await;
    let key_id = created["keyId"].as_i64().unwrap();

    let response = server
        .delete(&format!("/api/auth/api-keys/{key_id}"))
        .add_header("Authorization", common::bearer(&token))
        .await;
    response.assert_status_ok();
    assert_eq!(
        response.json::<serde_json::Value>()["message"],
        "API key revoked"
    );
    assert!(list_keys(&server, &token).await.is_empty());

    server
        .post("/api/shorten")
        .add_header("X-API-Key", created["apiKey"].as_str().unwrap())
        .json(&json!({ "originalUrl": "https://example.com" }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    server
        .delete(&format!("/api/auth/api-keys/{key_id}"))
        .add_header("Authorization", common::bearer(&token))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_revoke_other_users_key() {
    let server = common::create_test_server();
    let owner = common::register_and_login(&server, "ada@example.com").await;
    let other = common::register_and_login(&server, "bob@example.com").await;
    let key_id = create_key(&server, &owner).await["keyId"].as_i64().unwrap();

    server
        .delete(&format!("/api/auth/api-keys/{key_id}"))
        .add_header("Authorization", common::bearer(&other))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    assert_eq!(list_keys(&server, &owner).await.len(), 1);
}

#[tokio::test]
async fn test_revoke_non_numeric_id() {
    let server = common::create_test_server();
    let token = common::register_and_login(&server, "ada@example.com").await;

    server
        .delete("/api/auth/api-keys/abc")
        .add_header("Authorization", common::bearer(&token))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_api_key_authenticates_link_routes_only() {
    let server = common::create_test_server();
    let token = common::register_and_login(&server, "ada@example.com").await;
    let api_key = create_key(&server, &token).await["apiKey"]
        .as_str()
        .unwrap()
        .to_string();

    let response = server
        .post("/api/shorten")
        .add_header("X-API-Key", api_key.clone())
        .json(&json!({ "originalUrl": "https://example.com" }))
        .await;
    response.assert_status_ok();

    server
        .get("/api/history")
        .add_header("X-API-Key", api_key.clone())
        .await
        .assert_status_ok();

    server
        .get("/api/auth/me")
        .add_header("X-API-Key", api_key)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    let keys = list_keys(&server, &token).await;
    assert!(keys[0]["lastUsed"].is_string());
}

#[tokio::test]
async fn test_unknown_api_key() {
    let server = common::create_test_server();

    let response = server
        .post("/api/shorten")
        .add_header("X-API-Key", "deadbeef")
        .json(&json!({ "originalUrl": "https://example.com" }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.json::<serde_json::Value>()["error"]["message"],
        "Invalid API key"
    );
}
