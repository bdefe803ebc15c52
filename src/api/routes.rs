//! API route configuration.
//!
//! Public routes serve the ad feed and tracking; admin routes require the
//! shared admin key via [`crate::api::middleware::admin_auth`].

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};

use crate::api::handlers::{
    admin_list_ads_handler, admin_stats_handler, click_handler, create_ad_handler,
    delete_ad_handler, list_ads_handler, view_handler,
};
use crate::api::middleware::admin_auth;
use crate::state::AppState;

/// Public routes.
///
/// # Endpoints
///
/// - `GET  /ads`         - Ads eligible for display
/// - `POST /view/{id}`   - Record a view
/// - `POST /click/{id}`  - Record a click
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/ads", get(list_ads_handler))
        .route("/view/{id}", post(view_handler))
        .route("/click/{id}", post(click_handler))
}

/// Admin routes, protected by the `x-admin-key` header.
///
/// # Endpoints
///
/// - `GET    /ads`       - All ads with counters and `active` flag
/// - `POST   /ads`       - Create an ad
/// - `DELETE /ads/{id}`  - Delete an ad
/// - `GET    /stats`     - Per-ad statistics
pub fn admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/ads",
            get(admin_list_ads_handler).post(create_ad_handler),
        )
        .route("/ads/{id}", delete(delete_ad_handler))
        .route("/stats", get(admin_stats_handler))
        .layer(middleware::from_fn_with_state(state, admin_auth::layer))
}

/// Admin operations at their historical paths, next to the public feed.
///
/// Older front-ends post new ads to `/api/ads` with the admin header. Merged
/// into the public router: `GET /ads` stays public, the methods added here
/// require the admin key.
///
/// # Endpoints
///
/// - `POST   /ads`        - Create an ad
/// - `DELETE /ads/{id}`   - Delete an ad
/// - `GET    /ads/stats`  - Per-ad statistics
pub fn legacy_admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/ads", post(create_ad_handler))
        .route("/ads/stats", get(admin_stats_handler))
        .route("/ads/{id}", delete(delete_ad_handler))
        .route_layer(middleware::from_fn_with_state(state, admin_auth::layer))
}
