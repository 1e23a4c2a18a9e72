//! Provider endpoints.
//!
//! Each function serves one route of the provider's table. Paths in the
//! `#[utoipa::path]` annotations are relative to the provider base path.

use axum::http::{StatusCode, header};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use crate::models::session::SessionResponse;
use crate::models::user::UserResponse;
use crate::openapi::AuthApiDoc;

use super::provider::is_secure;
use super::{
    AuthError, AuthErrorBody, AuthRequest, AuthResponse, EmailPasswordAuth, cookie, password, store,
};

fn default_remember_me() -> bool {
    true
}

/// Request body for `POST /sign-up/email`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignUpEmailBody {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default = "default_remember_me")]
    pub remember_me: bool,
}

/// Request body for `POST /sign-in/email`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignInEmailBody {
    pub email: String,
    pub password: String,
    #[serde(default = "default_remember_me")]
    pub remember_me: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SignUpResponse {
    pub token: String,
    pub user: UserResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SignInResponse {
    pub redirect: bool,
    pub token: String,
    pub url: Option<String>,
    pub user: UserResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SignOutResponse {
    pub success: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionWithUser {
    pub session: SessionResponse,
    pub user: UserResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OkResponse {
    pub ok: bool,
}

/// Trim and lowercase an email address, rejecting obviously malformed ones.
pub(crate) fn normalize_email(raw: &str) -> Result<String, AuthError> {
    let email = raw.trim().to_lowercase();
    let (local, domain) = email.split_once('@').ok_or(AuthError::InvalidEmail)?;

    let valid = !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.chars().any(char::is_whitespace);

    if valid {
        Ok(email)
    } else {
        Err(AuthError::InvalidEmail)
    }
}

/// Liveness of the provider.
#[utoipa::path(
    get,
    path = "/ok",
    tag = "Authentication",
    responses((status = 200, description = "Provider is up", body = OkResponse))
)]
pub fn ok() -> Result<AuthResponse, AuthError> {
    AuthResponse::json(StatusCode::OK, &OkResponse { ok: true })
}

/// Register a user with email and password and sign them in.
#[utoipa::path(
    post,
    path = "/sign-up/email",
    tag = "Authentication",
    request_body = SignUpEmailBody,
    responses(
        (status = 200, description = "User created and session issued", body = SignUpResponse),
        (status = 400, description = "Invalid email, password or body", body = AuthErrorBody),
        (status = 403, description = "Untrusted origin", body = AuthErrorBody),
        (status = 422, description = "Email already registered", body = AuthErrorBody)
    )
)]
pub async fn sign_up_email(
    provider: &EmailPasswordAuth,
    request: &AuthRequest,
) -> Result<AuthResponse, AuthError> {
    let body: SignUpEmailBody = request.json()?;
    let email = normalize_email(&body.email)?;
    password::validate(&body.password)?;

    let name = body.name.trim();
    if name.is_empty() {
        return Err(AuthError::Validation("Name is required".to_string()));
    }

    if store::find_user_by_email(provider.pool(), &email)
        .await?
        .is_some()
    {
        return Err(AuthError::UserAlreadyExists);
    }

    let password_hash = password::hash_blocking(body.password).await?;
    let user = store::create_user_with_password(
        provider.pool(),
        name,
        &email,
        body.image.as_deref(),
        &password_hash,
    )
    .await?;

    tracing::info!(user_id = %user.id, "user signed up");

    let issued = provider
        .issue_session(request, user.id, body.remember_me)
        .await?;

    Ok(AuthResponse::json(
        StatusCode::OK,
        &SignUpResponse {
            token: issued.token,
            user: user.into(),
        },
    )?
    .with_header(header::SET_COOKIE.as_str(), issued.cookie))
}

/// Sign in with email and password.
#[utoipa::path(
    post,
    path = "/sign-in/email",
    tag = "Authentication",
    request_body = SignInEmailBody,
    responses(
        (status = 200, description = "Session issued", body = SignInResponse),
        (status = 400, description = "Invalid email or body", body = AuthErrorBody),
        (status = 401, description = "Wrong email or password", body = AuthErrorBody),
        (status = 403, description = "Untrusted origin", body = AuthErrorBody)
    )
)]
pub async fn sign_in_email(
    provider: &EmailPasswordAuth,
    request: &AuthRequest,
) -> Result<AuthResponse, AuthError> {
    let body: SignInEmailBody = request.json()?;
    let email = normalize_email(&body.email)?;

    let user = store::find_user_by_email(provider.pool(), &email).await?;
    let stored_hash = match &user {
        Some(user) => store::find_credential_account(provider.pool(), user.id)
            .await?
            .and_then(|account| account.password),
        None => None,
    };

    // Unknown email or no password: spend the same Argon2 work before failing
    let (Some(user), Some(stored_hash)) = (user, stored_hash) else {
        password::verify_dummy_blocking(body.password).await?;
        return Err(AuthError::InvalidCredentials);
    };

    if !password::verify_blocking(body.password, stored_hash).await? {
        tracing::info!(user_id = %user.id, "sign-in rejected");
        return Err(AuthError::InvalidCredentials);
    }

    let issued = provider
        .issue_session(request, user.id, body.remember_me)
        .await?;

    Ok(AuthResponse::json(
        StatusCode::OK,
        &SignInResponse {
            redirect: false,
            token: issued.token,
            url: None,
            user: user.into(),
        },
    )?
    .with_header(header::SET_COOKIE.as_str(), issued.cookie))
}

/// End the current session and clear the cookie.
#[utoipa::path(
    post,
    path = "/sign-out",
    tag = "Authentication",
    responses(
        (status = 200, description = "Session ended", body = SignOutResponse),
        (status = 403, description = "Untrusted origin", body = AuthErrorBody)
    )
)]
pub async fn sign_out(
    provider: &EmailPasswordAuth,
    request: &AuthRequest,
) -> Result<AuthResponse, AuthError> {
    if let Some(token) = provider.session_token(request) {
        store::delete_session(provider.pool(), &store::hash_token(token)).await?;
    }

    Ok(
        AuthResponse::json(StatusCode::OK, &SignOutResponse { success: true })?
            .with_header(header::SET_COOKIE.as_str(), cookie::expired_cookie(is_secure(request))),
    )
}

/// Current session and user, or `null` when signed out.
#[utoipa::path(
    get,
    path = "/get-session",
    tag = "Authentication",
    responses((status = 200, description = "Session and user, or null", body = SessionWithUser))
)]
pub async fn get_session(
    provider: &EmailPasswordAuth,
    request: &AuthRequest,
) -> Result<AuthResponse, AuthError> {
    let Some(token) = provider.session_token(request) else {
        return AuthResponse::json(StatusCode::OK, &serde_json::Value::Null);
    };
    let token_hash = store::hash_token(token);

    let Some(session) = store::find_session(provider.pool(), &token_hash).await? else {
        return AuthResponse::json(StatusCode::OK, &serde_json::Value::Null);
    };

    if session.is_expired(Utc::now()) {
        store::delete_session(provider.pool(), &token_hash).await?;
        return Ok(AuthResponse::json(StatusCode::OK, &serde_json::Value::Null)?
            .with_header(header::SET_COOKIE.as_str(), cookie::expired_cookie(is_secure(request))));
    }

    let Some(user) = store::find_user_by_id(provider.pool(), session.user_id).await? else {
        return AuthResponse::json(StatusCode::OK, &serde_json::Value::Null);
    };

    AuthResponse::json(
        StatusCode::OK,
        &SessionWithUser {
            session: SessionResponse::new(session, token),
            user: user.into(),
        },
    )
}

/// OpenAPI document of the provider's own routes.
#[utoipa::path(
    get,
    path = "/open-api/generate-schema",
    tag = "Authentication",
    responses((status = 200, description = "OpenAPI document"))
)]
pub fn generate_schema() -> Result<AuthResponse, AuthError> {
    let document = AuthApiDoc::openapi().to_json()?;
    Ok(AuthResponse::new(StatusCode::OK)
        .with_header(header::CONTENT_TYPE.as_str(), "application/json")
        .with_body(document))
}
