mod common;

use ad_server::config::ViewerKeySource;
use common::TestOptions;
use serde_json::{Value, json};

#[tokio::test]
async fn test_repeat_view_counts_once() {
    let server = common::make_server(Default::default()).await;
    common::create_ad(&server, common::text_ad("1")).await;

    let first = common::view(&server, "1", "device-42").await;
    let second = common::view(&server, "1", "device-42").await;

    assert_eq!(first, json!({ "success": true, "views": 1 }));
    assert_eq!(second, json!({ "success": true, "views": 1 }));
}

#[tokio::test]
async fn test_distinct_viewers_count_separately() {
    let server = common::make_server(Default::default()).await;
    common::create_ad(&server, common::text_ad("1")).await;

    common::view(&server, "1", "device-1").await;
    let response = common::view(&server, "1", "device-2").await;

    assert_eq!(response["views"], 2);
}

#[tokio::test]
async fn test_view_uses_forwarded_address_behind_proxy() {
    let server = common::make_server(TestOptions {
        behind_proxy: true,
        ..Default::default()
    })
    .await;
    common::create_ad(&server, common::text_ad("1")).await;

    for _ in 0..3 {
        server
            .post("/api/view/1")
            .add_header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
            .await
            .assert_status_ok();
    }

    let response = server
        .post("/api/view/1")
        .add_header("x-forwarded-for", "198.51.100.4")
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["views"], 2);

    let stats = server
        .get("/api/admin/stats")
        .add_header("x-admin-key", common::ADMIN_KEY)
        .await
        .json::<Value>();
    assert_eq!(stats["1"]["viewers"], json!(["198.51.100.4", "203.0.113.7"]));
}

#[tokio::test]
async fn test_forwarded_header_ignored_without_proxy() {
    let server = common::make_server(Default::default()).await;
    common::create_ad(&server, common::text_ad("1")).await;

    // No peer address on the test transport and forwarding headers are untrusted.
    let response = server
        .post("/api/view/1")
        .add_header("x-forwarded-for", "203.0.113.7")
        .await;

    response.assert_status_bad_request();
    assert_eq!(response.json::<Value>()["error"]["code"], "validation_error");
}

#[tokio::test]
async fn test_client_key_source_requires_viewer_id() {
    let server = common::make_server(TestOptions {
        viewer_key_source: ViewerKeySource::Client,
        behind_proxy: true,
        ..Default::default()
    })
    .await;
    common::create_ad(&server, common::text_ad("1")).await;

    let response = server
        .post("/api/view/1")
        .add_header("x-forwarded-for", "203.0.113.7")
        .json(&json!({}))
        .await;

    response.assert_status_bad_request();

    let response = common::view(&server, "1", "device-42").await;
    assert_eq!(response["views"], 1);
}

#[tokio::test]
async fn test_view_unknown_ad() {
    let server = common::make_server(Default::default()).await;

    let response = server
        .post("/api/view/missing")
        .json(&json!({ "viewerId": "device-42" }))
        .await;

    response.assert_status_not_found();
    assert_eq!(response.json::<Value>()["error"]["code"], "not_found");
}

#[tokio::test]
async fn test_clicks_are_not_deduplicated() {
    let server = common::make_server(Default::default()).await;
    common::create_ad(&server, common::text_ad("1")).await;

    server.post("/api/click/1").await.assert_status_ok();
    let response = server.post("/api/click/1").await;

    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>(),
        json!({ "success": true, "clicks": 2 })
    );
}

#[tokio::test]
async fn test_click_unknown_ad() {
    let server = common::make_server(Default::default()).await;

    server.post("/api/click/404").await.assert_status_not_found();

    let stats = server
        .get("/api/admin/stats")
        .add_header("x-admin-key", common::ADMIN_KEY)
        .await
        .json::<Value>();
    assert_eq!(stats, json!({}));
}
