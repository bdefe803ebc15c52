//! Handlers for admin endpoints (ad management and statistics).

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde_json::json;
use std::collections::BTreeMap;

use crate::api::dto::ad::{AdCreatedResponse, CreateAdRequest, MessageResponse};
use crate::application::services::AdView;
use crate::domain::entities::{AdId, AdStats, NewAd};
use crate::error::AppError;
use crate::state::AppState;

/// Lists every ad with counters and an `active` flag.
///
/// # Endpoint
///
/// `GET /api/admin/ads`
pub async fn admin_list_ads_handler(State(state): State<AppState>) -> Json<Vec<AdView>> {
    Json(state.catalog.list_all().await)
}

/// Creates an ad.
///
/// # Endpoint
///
/// `POST /api/admin/ads`
///
/// # Request Body
///
/// ```json
/// {
///   "id": "spring-sale",            // optional under the auto id policy
///   "type": "image",
///   "src": "/media/spring.png",
///   "link": "https://shop.example.com/spring",
///   "caption": "Spring sale",
///   "limitType": "views",           // optional: none | views | clicks
///   "limitCount": 1000              // number or numeric string
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request on malformed or invalid input, or when the id
/// already exists under the unique id policy.
pub async fn create_ad_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateAdRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AdCreatedResponse>), AppError> {
    let Json(payload) = payload.map_err(|e| {
        AppError::bad_request("Invalid request body", json!({ "reason": e.body_text() }))
    })?;

    let new_ad = NewAd::try_from(payload)?;
    let ad = state.catalog.create_ad(new_ad).await?;

    Ok((
        StatusCode::CREATED,
        Json(AdCreatedResponse {
            message: "Ad created".to_string(),
            ad,
        }),
    ))
}

/// Deletes an ad and, when cascading is enabled, its statistics.
///
/// # Endpoint
///
/// `DELETE /api/admin/ads/{id}`
///
/// # Errors
///
/// Returns 404 Not Found if the ad does not exist.
pub async fn delete_ad_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = AdId::new(id);
    state.catalog.delete_ad(&id).await?;

    Ok(Json(MessageResponse {
        message: format!("Ad {id} deleted"),
    }))
}

/// Returns per-ad statistics keyed by ad id.
///
/// # Endpoint
///
/// `GET /api/admin/stats`
///
/// # Response
///
/// ```json
/// {
///   "1": { "views": 2, "clicks": 1, "viewers": ["10.0.0.1", "device-42"] }
/// }
/// ```
pub async fn admin_stats_handler(
    State(state): State<AppState>,
) -> Json<BTreeMap<AdId, AdStats>> {
    Json(state.catalog.stats().await)
}
