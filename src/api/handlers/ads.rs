//! Handler for the public ad listing.

use axum::{Json, extract::State};

use crate::application::services::AdView;
use crate::state::AppState;

/// Lists ads that are currently eligible for display.
///
/// # Endpoint
///
/// `GET /api/ads`
///
/// Ads whose view or click limit has been reached are omitted. Each entry
/// carries the ad fields plus its `views` and `clicks` counters, in
/// catalog order.
pub async fn list_ads_handler(State(state): State<AppState>) -> Json<Vec<AdView>> {
    Json(state.catalog.list_visible().await)
}
