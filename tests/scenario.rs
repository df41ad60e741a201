mod common;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_full_user_journey() {
    let server = common::create_test_server();

    let token = common::register_and_login(&server, "ada@example.com").await;

    let key = server
        .post("/api/auth/api-keys")
        .add_header("Authorization", common::bearer(&token))
        .await
        .json::<serde_json::Value>()["apiKey"]
        .as_str()
        .unwrap()
        .to_string();

    let response = server
        .post("/api/shorten")
        .add_header("X-API-Key", key.clone())
        .json(&json!({ "originalUrl": "https://www.rust-lang.org/learn" }))
        .await;
    response.assert_status_ok();
    let link = response.json::<serde_json::Value>()["data"].clone();
    let code = link["urlCode"].as_str().unwrap();
    assert_eq!(code.len(), 8);
    assert!(link["shortUrl"].as_str().unwrap().ends_with(&format!("/{code}")));

    // Same owner, same URL, different credential.
    let again = common::shorten(&server, &token, "https://www.rust-lang.org/learn").await;
    assert_eq!(again["id"], link["id"]);

    let response = server.get(&format!("/api/{code}")).await;
    response.assert_status(StatusCode::FOUND);
    assert_eq!(
        response.header("location").to_str().unwrap(),
        "https://www.rust-lang.org/learn"
    );

    let stats = server.get(&format!("/api/stats/{code}")).await;
    stats.assert_status_ok();
    assert_eq!(stats.json::<serde_json::Value>()["data"]["clicks"], 1);

    let history = server
        .get("/api/history")
        .add_header("X-API-Key", key)
        .await
        .json::<serde_json::Value>();
    assert_eq!(history["data"].as_array().unwrap().len(), 1);
    assert_eq!(history["data"][0]["clicks"], 1);

    assert_eq!(
        common::metrics(&server).await,
        json!({ "totalUsers": 1, "totalUrls": 1, "totalClicks": 1 })
    );
}
