//! DTOs for ad management endpoints.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use serde_with::{NoneAsEmptyString, PickFirst, serde_as};
use std::sync::LazyLock;
use url::Url;
use validator::Validate;

use crate::domain::entities::{Ad, AdId, AdKind, LimitType, NewAd};
use crate::error::AppError;

/// Compiled regex for caller-supplied ad ids.
static AD_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{1,64}$").expect("ad id regex is valid"));

/// Request to create an ad.
///
/// Shape-level checks (lengths) run through `validator`; cross-field rules
/// (required fields per ad type, limit pairing, link scheme) run in the
/// conversion to [`NewAd`].
#[serde_as]
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAdRequest {
    /// Optional for the sequential id policy; accepts a string or an integer.
    pub id: Option<AdId>,

    #[serde(rename = "type")]
    pub ad_type: Option<String>,

    #[validate(length(max = 2000, message = "Text must be at most 2000 characters"))]
    pub text: Option<String>,

    #[validate(length(max = 2048, message = "Media source must be at most 2048 characters"))]
    pub src: Option<String>,

    #[validate(length(max = 2048, message = "Link must be at most 2048 characters"))]
    pub link: Option<String>,

    #[validate(length(max = 500, message = "Caption must be at most 500 characters"))]
    pub caption: Option<String>,

    pub limit_type: Option<String>,

    /// Accepts a number, a numeric string, or an empty string (no limit).
    #[serde_as(as = "PickFirst<(_, NoneAsEmptyString)>")]
    #[serde(default)]
    pub limit_count: Option<u64>,
}

impl TryFrom<CreateAdRequest> for NewAd {
    type Error = AppError;

    fn try_from(req: CreateAdRequest) -> Result<Self, Self::Error> {
        req.validate()?;

        if let Some(id) = &req.id
            && !AD_ID_REGEX.is_match(id.as_str())
        {
            return Err(AppError::bad_request(
                "Invalid ad id",
                json!({
                    "field": "id",
                    "reason": "Use 1-64 letters, digits, '-' or '_'",
                }),
            ));
        }

        let kind: AdKind = non_blank(req.ad_type)
            .ok_or_else(|| missing_field("type"))?
            .parse()
            .map_err(|reason: String| {
                AppError::bad_request("Invalid ad type", json!({ "field": "type", "reason": reason }))
            })?;

        let text = non_blank(req.text);
        let src = non_blank(req.src);
        let caption = non_blank(req.caption);

        match kind {
            AdKind::Text if text.is_none() => return Err(missing_field("text")),
            AdKind::Image | AdKind::Video if src.is_none() => return Err(missing_field("src")),
            _ => {}
        }

        let link = non_blank(req.link).ok_or_else(|| missing_field("link"))?;
        validate_link(&link)?;

        let limit_type: LimitType = match non_blank(req.limit_type) {
            Some(raw) => raw.parse().map_err(|reason: String| {
                AppError::bad_request(
                    "Invalid limit type",
                    json!({ "field": "limitType", "reason": reason }),
                )
            })?,
            None => LimitType::None,
        };

        if limit_type != LimitType::None && req.limit_count.is_none() {
            return Err(AppError::bad_request(
                "limitCount is required when limitType is set",
                json!({ "field": "limitCount", "limitType": limit_type.as_str() }),
            ));
        }

        Ok(NewAd {
            id: req.id,
            kind,
            text,
            src,
            link,
            caption,
            limit_type,
            limit_count: req.limit_count,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn missing_field(field: &str) -> AppError {
    AppError::bad_request(
        format!("Missing required field '{field}'"),
        json!({ "field": field }),
    )
}

/// Only absolute http(s) links are accepted as click-through targets.
fn validate_link(link: &str) -> Result<(), AppError> {
    let parsed = Url::parse(link).map_err(|e| {
        AppError::bad_request(
            "Invalid link URL",
            json!({ "field": "link", "reason": e.to_string() }),
        )
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(AppError::bad_request(
            "Invalid link URL",
            json!({ "field": "link", "reason": "Only http and https links are allowed" }),
        ));
    }

    Ok(())
}

/// Response returned after an ad was created.
#[derive(Debug, Serialize)]
pub struct AdCreatedResponse {
    pub message: String,
    pub ad: Ad,
}

/// Plain confirmation message.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
