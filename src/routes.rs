//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /health`      - Storage health check (public)
//! - `/api/*`            - Ad feed and tracking (public)
//! - `/api/admin/*`      - Ad management and statistics (`x-admin-key` required)
//! - `/api/ads` (POST), `/api/ads/{id}` (DELETE), `/api/ads/stats` - Same admin
//!   operations at their historical paths
//! - everything else     - Static front-end files
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket, stricter for admin routes
//! - **Admin authorization** - Shared secret header
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::{rate_limit, tracing};
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use std::path::Path;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::services::ServeDir;

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers; its
///   `behind_proxy` flag also decides how rate limits identify clients
/// - `static_dir` - directory served for paths no route matches
pub fn app_router(state: AppState, static_dir: impl AsRef<Path>) -> NormalizePath<Router> {
    let behind_proxy = state.behind_proxy;

    let admin_router = api::routes::admin_routes(state.clone())
        .layer(rate_limit::secure_layer(behind_proxy));

    let legacy_admin_router = api::routes::legacy_admin_routes(state.clone())
        .layer(rate_limit::secure_layer(behind_proxy));

    let api_router = api::routes::public_routes()
        .layer(rate_limit::layer(behind_proxy))
        .merge(legacy_admin_router)
        .nest("/admin", admin_router);

    let router = Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api_router)
        .fallback_service(ServeDir::new(static_dir.as_ref()))
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
