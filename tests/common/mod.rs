//! Stub authentication handlers shared by the integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{Router, http::StatusCode};
use hello_auth_api::{
    app::{self, AppState},
    auth::{AuthError, AuthHandler, AuthRequest, AuthResponse, HeaderList},
    config::DEFAULT_CORS_ORIGIN,
};

/// Records the last request and answers with a fixed status, echoing every
/// request header and the request body.
pub struct EchoHandler {
    status: StatusCode,
    extra_headers: HeaderList,
    last: Mutex<Option<AuthRequest>>,
}

impl EchoHandler {
    pub fn new(status: StatusCode) -> Arc<Self> {
        Self::with_headers(status, HeaderList::new())
    }

    /// Echo handler that emits `headers` before the echoed ones.
    pub fn with_headers(status: StatusCode, headers: HeaderList) -> Arc<Self> {
        Arc::new(Self {
            status,
            extra_headers: headers,
            last: Mutex::new(None),
        })
    }

    pub fn last_request(&self) -> Option<AuthRequest> {
        self.last.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuthHandler for EchoHandler {
    async fn handle(&self, request: AuthRequest) -> Result<AuthResponse, AuthError> {
        let mut response = AuthResponse::new(self.status);
        for (name, value) in self.extra_headers.iter() {
            response.headers.append(name, value);
        }
        for (name, value) in request.headers.iter() {
            response.headers.append(name, value);
        }
        if let Some(body) = &request.body {
            response = response.with_body(body.clone());
        }

        *self.last.lock().unwrap() = Some(request);
        Ok(response)
    }
}

/// Always fails as if the database were unreachable.
pub struct FailingHandler;

#[async_trait]
impl AuthHandler for FailingHandler {
    async fn handle(&self, _request: AuthRequest) -> Result<AuthResponse, AuthError> {
        Err(AuthError::Database(sqlx::Error::PoolTimedOut))
    }
}

/// Production router around `handler`, with the default CORS origin.
pub fn router(handler: Arc<dyn AuthHandler>) -> Router {
    app::build_router(
        AppState::new(handler),
        app::cors_layer(DEFAULT_CORS_ORIGIN).unwrap(),
    )
}
