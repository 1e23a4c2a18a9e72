//! Bridge between axum and an [`AuthHandler`].
//!
//! # Flow
//!
//! 1. Resolve an absolute URL from the `Host` header and the request path
//! 2. Copy every non-empty request header into a [`HeaderList`], with
//!    `content-length` recomputed for the re-serialized body
//! 3. Build an [`AuthRequest`], attaching the JSON body only if one was sent
//! 4. Hand it to the handler and await its [`AuthResponse`]
//! 5. Copy the status code
//! 6. Copy every response header, in order
//! 7. Attach the body, or an empty body if there is none
//!
//! The response is fully assembled before anything reaches the client, so a
//! failure at any step yields a clean 500 instead of a partial reply.

use axum::{
    body::{Body, Bytes},
    extract::{State, rejection::BytesRejection},
    http::{HeaderMap, Method, StatusCode, Uri, header},
    response::Response,
};
use url::Url;

use crate::app::AppState;
use crate::error::AppError;

use super::headers::HeaderError;
use super::{AuthError, AuthHandler, AuthRequest, AuthResponse, HeaderList};

/// Largest request body accepted on `/api/auth/*` (1 MiB). Enforced by the
/// route's `DefaultBodyLimit`.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Failures while translating a request or response.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("request has no usable Host header")]
    MissingHost,

    #[error("invalid request url: {0}")]
    Url(#[from] url::ParseError),

    #[error(transparent)]
    Header(#[from] HeaderError),

    #[error("authentication provider failed: {0}")]
    Provider(#[from] AuthError),
}

/// Route handler for `/api/auth/{*path}`.
///
/// # Errors
///
/// - `AppError::PayloadTooLarge` (413) if the body exceeds [`MAX_BODY_BYTES`]
/// - `AppError::InvalidRequest` (400) if the body is unreadable or not JSON
/// - `AppError::AuthBridge` (500) for any translation or provider failure
pub async fn handle_auth(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, AppError> {
    let body = read_json_body(body).inspect_err(|err| {
        tracing::warn!(
            method = %method,
            path = %uri.path(),
            error = %err,
            "rejected authentication request body"
        );
    })?;

    bridge(state.auth.as_ref(), &method, &uri, &headers, body)
        .await
        .inspect_err(|err| {
            tracing::error!(
                method = %method,
                path = %uri.path(),
                error = %err,
                "authentication bridge failed"
            );
        })
        .map_err(AppError::from)
}

/// Translate one request through `handler` and back.
pub async fn bridge(
    handler: &dyn AuthHandler,
    method: &Method,
    uri: &Uri,
    headers: &HeaderMap,
    body: Option<String>,
) -> Result<Response, BridgeError> {
    let url = absolute_url(headers, uri)?;
    let headers = forwarded_headers(headers, body.as_deref());

    let request = AuthRequest {
        method: method.clone(),
        url,
        headers,
        body,
    };

    let response = handler.handle(request).await?;
    into_response(response)
}

/// Inbound headers as a [`HeaderList`].
///
/// The body handed downstream is re-serialized, so the inbound framing
/// headers no longer describe it: they are dropped and `content-length` is
/// set to the length of `body`.
fn forwarded_headers(headers: &HeaderMap, body: Option<&str>) -> HeaderList {
    let mut list = HeaderList::from_header_map(headers);
    list.remove(header::CONTENT_LENGTH.as_str());
    list.remove(header::TRANSFER_ENCODING.as_str());
    if let Some(body) = body {
        list.append(header::CONTENT_LENGTH.as_str(), body.len().to_string());
    }
    list
}

/// `http://<host><path>?<query>` for the inbound request.
///
/// An absolute request-target (proxy form) is used as is.
pub fn absolute_url(headers: &HeaderMap, uri: &Uri) -> Result<Url, BridgeError> {
    if uri.scheme().is_some() && uri.authority().is_some() {
        return Ok(Url::parse(&uri.to_string())?);
    }

    let host = headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|host| !host.is_empty())
        .ok_or(BridgeError::MissingHost)?;

    let path_and_query = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");

    Ok(Url::parse(&format!("http://{}{}", host, path_and_query))?)
}

/// Check the buffered body and re-serialize it as JSON text.
///
/// Empty bodies map to `None` so bodyless methods never carry one downstream.
pub fn read_json_body(body: Result<Bytes, BytesRejection>) -> Result<Option<String>, AppError> {
    let bytes = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(MAX_BODY_BYTES)
        } else {
            AppError::InvalidRequest(rejection.body_text())
        }
    })?;

    json_body(&bytes)
}

fn json_body(bytes: &Bytes) -> Result<Option<String>, AppError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    let value: serde_json::Value = serde_json::from_slice(bytes)
        .map_err(|e| AppError::InvalidRequest(format!("Body is not valid JSON: {}", e)))?;

    serde_json::to_string(&value)
        .map(Some)
        .map_err(|e| AppError::InvalidRequest(e.to_string()))
}

/// Build the axum response: status, then headers, then body.
fn into_response(auth: AuthResponse) -> Result<Response, BridgeError> {
    let headers = auth.headers.to_header_map()?;

    let mut response = Response::new(Body::empty());
    *response.status_mut() = auth.status;
    *response.headers_mut() = headers;

    if let Some(body) = auth.body {
        *response.body_mut() = Body::from(body);
    }

    Ok(response)
}
