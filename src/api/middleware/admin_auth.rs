//! Shared-secret admin authorization middleware.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{error::AppError, state::AppState};

/// Header carrying the admin secret.
pub const ADMIN_KEY_HEADER: &str = "x-admin-key";

/// Authorizes admin requests by comparing `x-admin-key` with the configured key.
///
/// # Header Format
///
/// ```text
/// x-admin-key: <secret>
/// ```
///
/// # Errors
///
/// Returns `403 Forbidden` if the header is missing, not valid UTF-8, or
/// does not match exactly. The request never reaches the handler, so a
/// rejected call cannot change any state.
///
/// # Example
///
/// ```rust,ignore
/// use axum::{Router, routing::get, middleware};
/// use crate::api::middleware::admin_auth;
///
/// let admin = Router::new()
///     .route("/stats", get(admin_stats_handler))
///     .layer(middleware::from_fn_with_state(state.clone(), admin_auth::layer));
/// ```
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let provided = req
        .headers()
        .get(ADMIN_KEY_HEADER)
        .and_then(|v| v.to_str().ok());

    match provided {
        Some(key) if key == &*st.admin_key => Ok(next.run(req).await),
        Some(_) => {
            tracing::warn!(path = %req.uri().path(), "Rejected admin request with wrong key");
            Err(AppError::unauthorized(
                "Unauthorized",
                serde_json::json!({"reason": "Admin key does not match"}),
            ))
        }
        None => Err(AppError::unauthorized(
            "Unauthorized",
            serde_json::json!({"reason": "x-admin-key header is missing"}),
        )),
    }
}
