#![allow(dead_code)]

use ad_server::api;
use ad_server::api::handlers::health_handler;
use ad_server::application::services::{AdService, CatalogOptions, CatalogService, StatsService};
use ad_server::config::ViewerKeySource;
use ad_server::domain::IdPolicy;
use ad_server::domain::repositories::CollectionStore;
use ad_server::infrastructure::persistence::MemoryStore;
use ad_server::state::AppState;
use axum::{Router, routing::get};
use axum_test::TestServer;
use serde_json::{Value, json};
use std::sync::Arc;

pub const ADMIN_KEY: &str = "test-admin-key";

/// Knobs that differ between test scenarios.
#[derive(Debug, Clone, Copy)]
pub struct TestOptions {
    pub id_policy: IdPolicy,
    pub cascade_delete_stats: bool,
    pub viewer_key_source: ViewerKeySource,
    pub behind_proxy: bool,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            id_policy: IdPolicy::Unique,
            cascade_delete_stats: true,
            viewer_key_source: ViewerKeySource::Peer,
            behind_proxy: false,
        }
    }
}

pub async fn create_state_with_store(
    store: Arc<dyn CollectionStore>,
    options: TestOptions,
) -> AppState {
    let ads = Arc::new(AdService::load(store.clone()).await);
    let stats = Arc::new(StatsService::load(store.clone()).await);

    let catalog = CatalogService::new(
        ads,
        stats,
        CatalogOptions {
            id_policy: options.id_policy,
            cascade_delete_stats: options.cascade_delete_stats,
        },
    );

    AppState {
        catalog: Arc::new(catalog),
        store,
        admin_key: Arc::from(ADMIN_KEY),
        viewer_key_source: options.viewer_key_source,
        behind_proxy: options.behind_proxy,
    }
}

pub async fn create_test_state(options: TestOptions) -> AppState {
    create_state_with_store(Arc::new(MemoryStore::new()), options).await
}

/// Public, admin and health routes without rate limiting.
///
/// The test transport carries no peer address, so views must identify the
/// viewer through `viewerId` or forwarding headers.
pub fn make_router(state: AppState) -> Router {
    let api_router = api::routes::public_routes()
        .merge(api::routes::legacy_admin_routes(state.clone()))
        .nest("/admin", api::routes::admin_routes(state.clone()));

    Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api_router)
        .with_state(state)
}

pub async fn make_server(options: TestOptions) -> TestServer {
    let state = create_test_state(options).await;
    TestServer::new(make_router(state)).unwrap()
}

pub fn text_ad(id: &str) -> Value {
    json!({
        "id": id,
        "type": "text",
        "text": format!("Ad {id}"),
        "link": "https://example.com/landing"
    })
}

/// Creates an ad through the admin API and asserts success.
pub async fn create_ad(server: &TestServer, body: Value) -> Value {
    let response = server
        .post("/api/admin/ads")
        .add_header("x-admin-key", ADMIN_KEY)
        .json(&body)
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<Value>()
}

pub async fn view(server: &TestServer, id: &str, viewer: &str) -> Value {
    let response = server
        .post(&format!("/api/view/{id}"))
        .json(&json!({ "viewerId": viewer }))
        .await;

    response.assert_status_ok();
    response.json::<Value>()
}

pub async fn admin_ads(server: &TestServer) -> Vec<Value> {
    let response = server
        .get("/api/admin/ads")
        .add_header("x-admin-key", ADMIN_KEY)
        .await;

    response.assert_status_ok();
    response.json::<Vec<Value>>()
}
