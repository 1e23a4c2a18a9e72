//! Error types and HTTP error response handling.
//!
//! This module defines the errors route handlers can return and how they are
//! converted into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;

use crate::auth::bridge::BridgeError;

/// Body sent when the authentication bridge fails.
///
/// Field order is part of the wire format: `{"error": ..., "code": ...}`.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AuthFailureBody {
    pub error: String,
    pub code: String,
}

impl AuthFailureBody {
    pub fn new() -> Self {
        Self {
            error: "Internal authentication error".to_string(),
            code: "AUTH_FAILURE".to_string(),
        }
    }
}

impl Default for AuthFailureBody {
    fn default() -> Self {
        Self::new()
    }
}

/// Application-wide error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Translating a request to the authentication provider, calling it, or
    /// translating its response failed.
    ///
    /// Returns HTTP 500 with a fixed body; details stay in the logs.
    #[error("Authentication bridge failed: {0}")]
    AuthBridge(#[from] BridgeError),

    /// Request body or parameters are invalid.
    ///
    /// Returns HTTP 400 Bad Request.
    /// The String contains details about what was invalid.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Request body is larger than the accepted limit, in bytes.
    ///
    /// Returns HTTP 413 Payload Too Large.
    #[error("Request body exceeds {0} bytes")]
    PayloadTooLarge(usize),
}

/// Convert AppError into an HTTP response.
///
/// # Response Format
///
/// - `AuthBridge` → 500 `{"error":"Internal authentication error","code":"AUTH_FAILURE"}`
/// - `InvalidRequest` → 400 `{"error":{"code":"invalid_request","message":"..."}}`
/// - `PayloadTooLarge` → 413 `{"error":{"code":"payload_too_large","message":"..."}}`
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::AuthBridge(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(AuthFailureBody::new()),
            )
                .into_response(),
            AppError::InvalidRequest(message) => {
                let body = Json(json!({
                    "error": {
                        "code": "invalid_request",
                        "message": message
                    }
                }));
                (StatusCode::BAD_REQUEST, body).into_response()
            }
            AppError::PayloadTooLarge(limit) => {
                let body = Json(json!({
                    "error": {
                        "code": "payload_too_large",
                        "message": format!("Request body exceeds {} bytes", limit)
                    }
                }));
                (StatusCode::PAYLOAD_TOO_LARGE, body).into_response()
            }
        }
    }
}
