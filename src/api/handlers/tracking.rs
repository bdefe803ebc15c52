//! Handlers for view and click tracking.

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::HeaderMap,
};
use tracing::debug;

use crate::api::dto::tracking::{ClickResponse, ViewRequest, ViewResponse};
use crate::config::ViewerKeySource;
use crate::domain::entities::AdId;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_addr::{PeerAddr, client_ip};

/// Records a view of an ad, counting each viewer once.
///
/// # Endpoint
///
/// `POST /api/view/{id}`
///
/// # Request Body (optional)
///
/// ```json
/// { "viewerId": "device-42" }
/// ```
///
/// # Viewer Identity
///
/// - `client` source: `viewerId` is required.
/// - `peer` source: `viewerId` when given, otherwise the client address.
///
/// # Response
///
/// ```json
/// { "success": true, "views": 12 }
/// ```
///
/// # Errors
///
/// Returns 404 Not Found if the ad does not exist.
/// Returns 400 Bad Request if no viewer identity can be determined.
pub async fn view_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    PeerAddr(peer): PeerAddr,
    body: Bytes,
) -> Result<Json<ViewResponse>, AppError> {
    let id = AdId::new(id);
    let request = ViewRequest::from_body(&body);

    let viewer = match (request.viewer_id(), state.viewer_key_source) {
        (Some(viewer_id), _) => viewer_id.to_string(),
        (None, ViewerKeySource::Client) => return Err(AppError::missing_client_key()),
        (None, ViewerKeySource::Peer) => client_ip(&headers, peer, state.behind_proxy)
            .ok_or_else(AppError::missing_client_key)?,
    };

    let views = state.catalog.record_view(&id, &viewer).await?;

    debug!(ad_id = %id, views, "View recorded");

    Ok(Json(ViewResponse {
        success: true,
        views,
    }))
}

/// Records a click on an ad. Every click counts.
///
/// # Endpoint
///
/// `POST /api/click/{id}`
///
/// # Errors
///
/// Returns 404 Not Found if the ad does not exist.
pub async fn click_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ClickResponse>, AppError> {
    let id = AdId::new(id);
    let clicks = state.catalog.record_click(&id).await?;

    debug!(ad_id = %id, clicks, "Click recorded");

    Ok(Json(ClickResponse {
        success: true,
        clicks,
    }))
}
