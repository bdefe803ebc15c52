//! Application error type and its HTTP representation.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use std::fmt;

use crate::domain::repositories::StoreError;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Machine-readable error payload returned to clients.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

/// Errors surfaced by services and handlers.
///
/// Every variant is scoped to a single request; none is fatal to the process.
#[derive(Debug)]
pub enum AppError {
    /// Missing or malformed input (400).
    Validation { message: String, details: Value },
    /// Insert collided with an existing id under the unique id policy (400).
    DuplicateId { message: String, details: Value },
    /// Admin key missing or wrong (403).
    Unauthorized { message: String, details: Value },
    /// Target ad does not exist (404).
    NotFound { message: String, details: Value },
    /// Writing a collection failed (500).
    Persistence { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn duplicate_id(message: impl Into<String>, details: Value) -> Self {
        Self::DuplicateId {
            message: message.into(),
            details,
        }
    }
    pub fn unauthorized(message: impl Into<String>, details: Value) -> Self {
        Self::Unauthorized {
            message: message.into(),
            details,
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn persistence(message: impl Into<String>, details: Value) -> Self {
        Self::Persistence {
            message: message.into(),
            details,
        }
    }

    /// Shorthand for the error returned when a view arrives without a client key.
    pub fn missing_client_key() -> Self {
        Self::bad_request(
            "Missing client key",
            json!({ "field": "viewerId", "reason": "A viewer identifier is required" }),
        )
    }

    fn parts(&self) -> (StatusCode, &'static str, &str, &Value) {
        match self {
            AppError::Validation { message, details } => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                message.as_str(),
                details,
            ),
            AppError::DuplicateId { message, details } => {
                (StatusCode::BAD_REQUEST, "duplicate_id", message.as_str(), details)
            }
            AppError::Unauthorized { message, details } => {
                (StatusCode::FORBIDDEN, "unauthorized", message.as_str(), details)
            }
            AppError::NotFound { message, details } => {
                (StatusCode::NOT_FOUND, "not_found", message.as_str(), details)
            }
            AppError::Persistence { message, details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "persistence_error",
                message.as_str(),
                details,
            ),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.parts().0
    }

    pub fn to_error_info(&self) -> ErrorInfo {
        let (_, code, message, details) = self.parts();
        ErrorInfo {
            code,
            message: message.to_string(),
            details: details.clone(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (_, code, message, _) = self.parts();
        write!(f, "{code}: {message}")
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::persistence("Failed to persist data", json!({ "reason": e.to_string() }))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        let fields: serde_json::Map<String, Value> = e
            .field_errors()
            .into_iter()
            .map(|(field, errors)| {
                let messages: Vec<String> = errors
                    .iter()
                    .map(|err| {
                        err.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| err.code.to_string())
                    })
                    .collect();
                (field.to_string(), json!(messages))
            })
            .collect();

        AppError::bad_request("Validation failed", json!({ "fields": fields }))
    }
}
