//! Email/password authentication provider.
//!
//! Owns the route table under the configured base path (`/api/auth`), the
//! origin check for state-changing requests, and session issuance.

use async_trait::async_trait;
use axum::http::Method;
use chrono::{Duration, Utc};

use crate::db::DbPool;
use crate::models::session::{NewSession, Session};

use super::{AuthError, AuthHandler, AuthRequest, AuthResponse, cookie, endpoints, store};

/// Lifetime of a remembered session.
pub const SESSION_TTL_DAYS: i64 = 7;

/// Lifetime of a session opened with `rememberMe: false`.
pub const SHORT_SESSION_TTL_DAYS: i64 = 1;

/// Provider settings.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Path prefix the provider is mounted under, e.g. `/api/auth`
    pub base_path: String,

    /// Key used to sign session cookies
    pub secret: String,

    /// Browser origins allowed to send state-changing requests
    pub trusted_origins: Vec<String>,
}

/// Session minted for a user, with the raw token that goes into the cookie.
pub(crate) struct IssuedSession {
    pub token: String,
    pub session: Session,
    pub cookie: String,
}

/// Authentication provider backed by PostgreSQL.
pub struct EmailPasswordAuth {
    pool: DbPool,
    config: ProviderConfig,
}

impl EmailPasswordAuth {
    pub fn new(pool: DbPool, config: ProviderConfig) -> Self {
        Self { pool, config }
    }

    pub(crate) fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub(crate) fn secret(&self) -> &str {
        &self.config.secret
    }

    async fn dispatch(&self, request: &AuthRequest) -> Result<AuthResponse, AuthError> {
        let path =
            relative_path(&self.config.base_path, request.url.path()).ok_or(AuthError::NotFound)?;

        if request.method == Method::POST {
            check_origin(request, &self.config.trusted_origins)?;
        }

        // HEAD is answered like GET; the server drops the body
        let method = if request.method == Method::HEAD {
            &Method::GET
        } else {
            &request.method
        };

        match (method, path) {
            (&Method::GET, "/ok") => endpoints::ok(),
            (&Method::GET, "/get-session") => endpoints::get_session(self, request).await,
            (&Method::GET, "/open-api/generate-schema") => endpoints::generate_schema(),
            (&Method::POST, "/sign-up/email") => endpoints::sign_up_email(self, request).await,
            (&Method::POST, "/sign-in/email") => endpoints::sign_in_email(self, request).await,
            (&Method::POST, "/sign-out") => endpoints::sign_out(self, request).await,
            _ => Err(AuthError::NotFound),
        }
    }

    /// Create a session row and the matching `Set-Cookie` value.
    pub(crate) async fn issue_session(
        &self,
        request: &AuthRequest,
        user_id: uuid::Uuid,
        remember: bool,
    ) -> Result<IssuedSession, AuthError> {
        let token = store::generate_token();
        let ttl_days = if remember {
            SESSION_TTL_DAYS
        } else {
            SHORT_SESSION_TTL_DAYS
        };

        let session = store::insert_session(
            &self.pool,
            NewSession {
                user_id,
                token_hash: store::hash_token(&token),
                expires_at: Utc::now() + Duration::days(ttl_days),
                ip_address: client_ip(request),
                user_agent: request.header("user-agent").map(str::to_string),
            },
        )
        .await?;

        let max_age = remember.then(|| Duration::days(ttl_days).num_seconds());
        let cookie = cookie::session_cookie(
            &cookie::sign(&token, &self.config.secret),
            max_age,
            is_secure(request),
        );

        tracing::debug!(user_id = %user_id, session_id = %session.id, "session issued");

        Ok(IssuedSession {
            token,
            session,
            cookie,
        })
    }

    /// Raw session token from a correctly signed cookie, if any.
    pub(crate) fn session_token<'a>(&self, request: &'a AuthRequest) -> Option<&'a str> {
        let value = cookie::find(&request.headers, cookie::SESSION_COOKIE)?;
        let token = cookie::verify(value, &self.config.secret);
        if token.is_none() {
            tracing::debug!("ignoring session cookie with invalid signature");
        }
        token
    }
}

#[async_trait]
impl AuthHandler for EmailPasswordAuth {
    async fn handle(&self, request: AuthRequest) -> Result<AuthResponse, AuthError> {
        match self.dispatch(&request).await {
            Ok(response) => Ok(response),
            Err(err) => {
                tracing::debug!(method = %request.method, path = %request.url.path(), error = %err, "auth request rejected");
                err.into_response()
            }
        }
    }
}

/// Path below `base`, without a trailing slash. `None` if outside `base`.
fn relative_path<'a>(base: &str, path: &'a str) -> Option<&'a str> {
    let rest = path.strip_prefix(base.trim_end_matches('/'))?;
    if !rest.starts_with('/') {
        return None;
    }
    if rest.len() > 1 {
        Some(rest.trim_end_matches('/'))
    } else {
        Some(rest)
    }
}

/// Reject requests whose `Origin` is neither trusted nor the request's own.
///
/// Requests without an `Origin` header (non-browser clients) pass.
fn check_origin(request: &AuthRequest, trusted: &[String]) -> Result<(), AuthError> {
    let Some(origin) = request.header("origin") else {
        return Ok(());
    };
    let origin = origin.trim_end_matches('/');

    if origin == request.origin() || trusted.iter().any(|t| t.trim_end_matches('/') == origin) {
        Ok(())
    } else {
        Err(AuthError::InvalidOrigin)
    }
}

fn client_ip(request: &AuthRequest) -> Option<String> {
    request
        .header("x-forwarded-for")
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map(str::to_string)
}

pub(crate) fn is_secure(request: &AuthRequest) -> bool {
    request.url.scheme() == "https"
}
