//! Advertisement entity and its visibility cap.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{AdId, AdStats};

/// Rendering kind of an advertisement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdKind {
    Text,
    Image,
    Video,
}

impl AdKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Video => "video",
        }
    }
}

impl fmt::Display for AdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "image" => Ok(Self::Image),
            "video" => Ok(Self::Video),
            other => Err(format!(
                "unknown ad type '{other}', expected one of: text, image, video"
            )),
        }
    }
}

/// Which counter, if any, caps the visibility of an ad.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LimitType {
    #[default]
    None,
    Views,
    Clicks,
}

impl LimitType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Views => "views",
            Self::Clicks => "clicks",
        }
    }
}

impl fmt::Display for LimitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LimitType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(Self::None),
            "views" => Ok(Self::Views),
            "clicks" => Ok(Self::Clicks),
            other => Err(format!(
                "unknown limit type '{other}', expected one of: none, views, clicks"
            )),
        }
    }
}

/// A stored advertisement definition.
///
/// Optional display fields are omitted from JSON when absent so that the
/// persisted file stays close to what the front-end submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ad {
    pub id: AdId,
    #[serde(rename = "type")]
    pub kind: AdKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    pub link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default)]
    pub limit_type: LimitType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Ad {
    /// Returns false once the configured limit counter has reached its threshold.
    ///
    /// An ad without a limit type, or with a limit type but no count, is
    /// always active.
    pub fn is_active(&self, stats: &AdStats) -> bool {
        let Some(limit) = self.limit_count else {
            return true;
        };

        match self.limit_type {
            LimitType::None => true,
            LimitType::Views => stats.views < limit,
            LimitType::Clicks => stats.clicks < limit,
        }
    }
}

/// Validated input for creating an ad.
///
/// `id` is optional because the sequential id policy assigns it.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAd {
    pub id: Option<AdId>,
    pub kind: AdKind,
    pub text: Option<String>,
    pub src: Option<String>,
    pub link: String,
    pub caption: Option<String>,
    pub limit_type: LimitType,
    pub limit_count: Option<u64>,
}

impl NewAd {
    /// Builds the stored ad under the given id, stamping the creation time.
    pub fn into_ad(self, id: AdId) -> Ad {
        Ad {
            id,
            kind: self.kind,
            text: self.text,
            src: self.src,
            link: self.link,
            caption: self.caption,
            limit_type: self.limit_type,
            limit_count: self.limit_count,
            created_at: Some(Utc::now()),
        }
    }
}
