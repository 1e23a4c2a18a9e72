//! Authentication: the provider behind `/api/auth/*` and the bridge that
//! mounts it on the router.
//!
//! The router and the provider only meet through [`AuthHandler`]: a generic
//! [`AuthRequest`] goes in and a generic [`AuthResponse`] comes out. Anything
//! implementing the trait can be mounted, which is how tests swap in stubs.

use async_trait::async_trait;
use axum::{
    body::Bytes,
    http::{Method, StatusCode, header},
};
use serde::{Serialize, de::DeserializeOwned};
use url::Url;

pub mod bridge;
pub mod cookie;
pub mod endpoints;
pub mod headers;
pub mod password;
pub mod provider;
pub mod store;

pub use headers::HeaderList;
pub use provider::{EmailPasswordAuth, ProviderConfig};

/// Request descriptor handed to an [`AuthHandler`].
#[derive(Debug, Clone)]
pub struct AuthRequest {
    pub method: Method,

    /// Absolute URL, including scheme and host.
    pub url: Url,

    pub headers: HeaderList,

    /// JSON text of the request body. `None` when the client sent no body.
    pub body: Option<String>,
}

impl AuthRequest {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderList::new(),
            body: None,
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// Deserialize the body, failing with [`AuthError::Validation`] if it is
    /// missing or does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, AuthError> {
        let body = self
            .body
            .as_deref()
            .ok_or_else(|| AuthError::Validation("Request body is required".to_string()))?;
        serde_json::from_str(body).map_err(|e| AuthError::Validation(e.to_string()))
    }

    /// Origin (`scheme://host[:port]`) of the request URL.
    pub fn origin(&self) -> String {
        self.url.origin().ascii_serialization()
    }
}

/// Response descriptor produced by an [`AuthHandler`].
#[derive(Debug, Clone)]
pub struct AuthResponse {
    pub status: StatusCode,
    pub headers: HeaderList,

    /// Raw body bytes; `None` means no body at all.
    pub body: Option<Bytes>,
}

impl AuthResponse {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderList::new(),
            body: None,
        }
    }

    /// JSON response with a `content-type` header.
    pub fn json<T: Serialize + ?Sized>(status: StatusCode, value: &T) -> Result<Self, AuthError> {
        let body = serde_json::to_vec(value)?;
        Ok(Self::new(status)
            .with_header(header::CONTENT_TYPE.as_str(), "application/json")
            .with_body(body))
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// Anything that can answer authentication requests.
#[async_trait]
pub trait AuthHandler: Send + Sync {
    /// Produce the response for one request.
    ///
    /// Expected failures (bad credentials, validation, unknown routes) are
    /// returned as `Ok` responses with an error status. `Err` is reserved for
    /// failures the handler could not turn into a response.
    async fn handle(&self, request: AuthRequest) -> Result<AuthResponse, AuthError>;
}

/// JSON error body returned by the provider.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AuthErrorBody {
    /// Machine-readable error code, e.g. `INVALID_EMAIL_OR_PASSWORD`
    pub code: String,
    pub message: String,
}

/// Errors raised while serving an authentication request.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid email")]
    InvalidEmail,

    #[error("Password too short")]
    PasswordTooShort,

    #[error("Password too long")]
    PasswordTooLong,

    /// Body missing or not matching the expected shape.
    #[error("{0}")]
    Validation(String),

    #[error("User already exists. Use another email.")]
    UserAlreadyExists,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Invalid origin")]
    InvalidOrigin,

    #[error("Not Found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AuthError {
    /// Status and code for errors the client is allowed to see.
    ///
    /// Infrastructure errors return `None` and stay internal.
    fn client_facing(&self) -> Option<(StatusCode, &'static str)> {
        let mapped = match self {
            AuthError::InvalidEmail => (StatusCode::BAD_REQUEST, "INVALID_EMAIL"),
            AuthError::PasswordTooShort => (StatusCode::BAD_REQUEST, "PASSWORD_TOO_SHORT"),
            AuthError::PasswordTooLong => (StatusCode::BAD_REQUEST, "PASSWORD_TOO_LONG"),
            AuthError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AuthError::UserAlreadyExists => {
                (StatusCode::UNPROCESSABLE_ENTITY, "USER_ALREADY_EXISTS")
            }
            AuthError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "INVALID_EMAIL_OR_PASSWORD")
            }
            AuthError::InvalidOrigin => (StatusCode::FORBIDDEN, "INVALID_ORIGIN"),
            AuthError::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AuthError::Database(_) | AuthError::PasswordHash(_) | AuthError::Serialization(_) => {
                return None;
            }
        };
        Some(mapped)
    }

    /// Turn a client-facing error into its JSON response; pass anything else
    /// through unchanged.
    pub fn into_response(self) -> Result<AuthResponse, AuthError> {
        match self.client_facing() {
            Some((status, code)) => AuthResponse::json(
                status,
                &AuthErrorBody {
                    code: code.to_string(),
                    message: self.to_string(),
                },
            ),
            None => Err(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(body: Option<&str>) -> AuthRequest {
        let mut request = AuthRequest::new(
            Method::POST,
            Url::parse("http://localhost:8080/api/auth/sign-in/email").unwrap(),
        );
        request.body = body.map(str::to_string);
        request
    }

    #[test]
    fn client_errors_become_responses() {
        let response = AuthError::InvalidCredentials.into_response().unwrap();
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);

        let body: serde_json::Value =
            serde_json::from_slice(response.body.as_ref().unwrap()).unwrap();
        assert_eq!(body["code"], "INVALID_EMAIL_OR_PASSWORD");
        assert_eq!(body["message"], "Invalid email or password");
        assert_eq!(response.headers.get("content-type"), Some("application/json"));
    }

    #[test]
    fn infrastructure_errors_pass_through() {
        let err = AuthError::PasswordHash("boom".into()).into_response();
        assert!(matches!(err, Err(AuthError::PasswordHash(_))));
    }

    #[test]
    fn missing_body_is_a_validation_error() {
        #[derive(serde::Deserialize)]
        struct Body {
            #[allow(dead_code)]
            email: String,
        }

        assert!(matches!(
            request(None).json::<Body>(),
            Err(AuthError::Validation(_))
        ));
        assert!(matches!(
            request(Some(r#"{"name":"x"}"#)).json::<Body>(),
            Err(AuthError::Validation(_))
        ));
        assert!(request(Some(r#"{"email":"a@b.co"}"#)).json::<Body>().is_ok());
    }

    #[test]
    fn origin_is_derived_from_url() {
        assert_eq!(request(None).origin(), "http://localhost:8080");
    }
}
