mod common;

use ad_server::infrastructure::persistence::JsonFileStore;
use axum_test::TestServer;
use serde_json::{Value, json};
use std::sync::Arc;
use tempfile::TempDir;

async fn server_for(dir: &TempDir) -> TestServer {
    let store = Arc::new(JsonFileStore::new(dir.path()));
    let state = common::create_state_with_store(store, Default::default()).await;
    TestServer::new(common::make_router(state)).unwrap()
}

#[tokio::test]
async fn test_state_survives_restart() {
    let dir = TempDir::new().unwrap();

    {
        let server = server_for(&dir).await;
        common::create_ad(&server, common::text_ad("1")).await;
        common::view(&server, "1", "device-42").await;
        server.post("/api/click/1").await.assert_status_ok();
    }

    assert!(dir.path().join("ads.json").exists());
    assert!(dir.path().join("ad_stats.json").exists());

    let server = server_for(&dir).await;

    let ads = server.get("/api/ads").await.json::<Vec<Value>>();
    assert_eq!(ads.len(), 1);
    assert_eq!(ads[0]["id"], "1");
    assert_eq!(ads[0]["views"], 1);
    assert_eq!(ads[0]["clicks"], 1);

    // The viewer set is persisted too, so the repeat view is not counted.
    let response = common::view(&server, "1", "device-42").await;
    assert_eq!(response["views"], 1);
}

#[tokio::test]
async fn test_hand_edited_files_load() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("ads.json"),
        r#"[{"id": 5, "type": "image", "src": "/a.png", "link": "https://example.com"}]"#,
    )
    .unwrap();
    std::fs::write(
        dir.path().join("ad_stats.json"),
        r#"{"5": {"views": 99, "viewers": ["x", "y"]}}"#,
    )
    .unwrap();

    let server = server_for(&dir).await;

    let ads = server.get("/api/ads").await.json::<Vec<Value>>();
    assert_eq!(ads[0]["id"], "5");
    // Inconsistent view counts are repaired from the viewer set.
    assert_eq!(ads[0]["views"], 2);
    assert_eq!(ads[0]["clicks"], 0);

    let stats = server
        .get("/api/admin/stats")
        .add_header("x-admin-key", common::ADMIN_KEY)
        .await
        .json::<Value>();
    assert_eq!(stats["5"], json!({ "views": 2, "clicks": 0, "viewers": ["x", "y"] }));
}

#[tokio::test]
async fn test_corrupt_file_treated_as_empty() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("ads.json"), "{ not json").unwrap();

    let server = server_for(&dir).await;

    assert!(server.get("/api/ads").await.json::<Vec<Value>>().is_empty());

    common::create_ad(&server, common::text_ad("fresh")).await;

    let saved = std::fs::read_to_string(dir.path().join("ads.json")).unwrap();
    let saved: Vec<Value> = serde_json::from_str(&saved).unwrap();
    assert_eq!(saved[0]["id"], "fresh");
}
