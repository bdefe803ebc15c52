mod common;

use serde_json::{Value, json};

#[tokio::test]
async fn test_list_ads_empty() {
    let server = common::make_server(Default::default()).await;

    let response = server.get("/api/ads").await;

    response.assert_status_ok();
    assert_eq!(response.json::<Vec<Value>>().len(), 0);
}

#[tokio::test]
async fn test_list_ads_in_insertion_order_with_counters() {
    let server = common::make_server(Default::default()).await;
    common::create_ad(&server, common::text_ad("b")).await;
    common::create_ad(&server, common::text_ad("a")).await;

    common::view(&server, "a", "viewer-1").await;

    let ads = server.get("/api/ads").await.json::<Vec<Value>>();

    assert_eq!(ads.len(), 2);
    assert_eq!(ads[0]["id"], "b");
    assert_eq!(ads[0]["views"], 0);
    assert_eq!(ads[0]["clicks"], 0);
    assert_eq!(ads[1]["id"], "a");
    assert_eq!(ads[1]["views"], 1);
    assert_eq!(ads[1]["type"], "text");
    assert!(ads[1].get("active").is_none());
}

#[tokio::test]
async fn test_view_limit_hides_ad_publicly() {
    let server = common::make_server(Default::default()).await;
    common::create_ad(
        &server,
        json!({
            "id": "limited",
            "type": "image",
            "src": "/media/banner.png",
            "link": "https://example.com",
            "limitType": "views",
            "limitCount": 2
        }),
    )
    .await;
    common::create_ad(&server, common::text_ad("open")).await;

    common::view(&server, "limited", "viewer-1").await;
    assert_eq!(server.get("/api/ads").await.json::<Vec<Value>>().len(), 2);

    common::view(&server, "limited", "viewer-2").await;

    let public = server.get("/api/ads").await.json::<Vec<Value>>();
    assert_eq!(public.len(), 1);
    assert_eq!(public[0]["id"], "open");

    let admin = common::admin_ads(&server).await;
    let limited = admin.iter().find(|ad| ad["id"] == "limited").unwrap();
    assert_eq!(limited["active"], false);
    assert_eq!(limited["views"], 2);
}

#[tokio::test]
async fn test_click_limit_hides_ad_publicly() {
    let server = common::make_server(Default::default()).await;
    common::create_ad(
        &server,
        json!({
            "id": "7",
            "type": "text",
            "text": "Hello",
            "link": "https://example.com",
            "limitType": "clicks",
            "limitCount": "1"
        }),
    )
    .await;

    server.post("/api/click/7").await.assert_status_ok();

    assert!(server.get("/api/ads").await.json::<Vec<Value>>().is_empty());

    // Counting continues after the limit is reached.
    let response = server.post("/api/click/7").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["clicks"], 2);
}
