//! DTOs for view and click tracking endpoints.

use serde::{Deserialize, Serialize};

/// Optional body of `POST /api/view/{id}`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewRequest {
    pub viewer_id: Option<String>,
}

impl ViewRequest {
    /// Parses a request body, treating an empty body as no viewer id.
    ///
    /// Malformed JSON is also treated as absent, so clients that post
    /// form-encoded or plain bodies still fall back to the peer address.
    pub fn from_body(body: &[u8]) -> Self {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Self::default();
        }

        serde_json::from_slice(body).unwrap_or_default()
    }

    /// Viewer id with surrounding whitespace removed, if non-empty.
    pub fn viewer_id(&self) -> Option<&str> {
        self.viewer_id
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ViewResponse {
    pub success: bool,
    pub views: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClickResponse {
    pub success: bool,
    pub clicks: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_body() {
        assert!(ViewRequest::from_body(b"").viewer_id().is_none());
        assert!(ViewRequest::from_body(b"  \n").viewer_id().is_none());
    }

    #[test]
    fn test_viewer_id_trimmed() {
        let req = ViewRequest::from_body(br#"{"viewerId":"  device-42 "}"#);
        assert_eq!(req.viewer_id(), Some("device-42"));
    }

    #[test]
    fn test_blank_viewer_id_ignored() {
        let req = ViewRequest::from_body(br#"{"viewerId":"   "}"#);
        assert!(req.viewer_id().is_none());
    }

    #[test]
    fn test_malformed_body_ignored() {
        assert!(ViewRequest::from_body(b"viewerId=abc").viewer_id().is_none());
    }
}
