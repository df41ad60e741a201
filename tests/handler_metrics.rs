mod common;

use serde_json::json;

#[tokio::test]
async fn test_metrics_empty_store() {
    let server = common::create_test_server();

    let json = common::metrics(&server).await;

    assert_eq!(
        json,
        json!({ "totalUsers": 0, "totalUrls": 0, "totalClicks": 0 })
    );
}

#[tokio::test]
async fn test_metrics_counts() {
    let server = common::create_test_server();
    let ada = common::register_and_login(&server, "ada@example.com").await;
    common::register_and_login(&server, "bob@example.com").await;

    let first = common::shorten(&server, &ada, "https://example.com/1").await;
    common::shorten(&server, &ada, "https://example.com/2").await;

    let code = first["urlCode"].as_str().unwrap();
    server.get(&format!("/api/{code}")).await;
    server.get(&format!("/api/{code}")).await;

    assert_eq!(
        common::metrics(&server).await,
        json!({ "totalUsers": 2, "totalUrls": 2, "totalClicks": 2 })
    );
}
