//! Database access for users, credential accounts and sessions.

use chrono::Utc;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::db::DbPool;
use crate::models::account::{Account, CREDENTIAL_PROVIDER};
use crate::models::session::{NewSession, Session};
use crate::models::user::User;

use super::AuthError;

/// SHA-256 hex digest of a session token.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Generate a random session token (64 hex characters).
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::random();
    hex::encode(bytes)
}

pub async fn find_user_by_email(pool: &DbPool, email: &str) -> Result<Option<User>, AuthError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, name, email, email_verified, image, created_at, updated_at
         FROM users
         WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn find_user_by_id(pool: &DbPool, id: Uuid) -> Result<Option<User>, AuthError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, name, email, email_verified, image, created_at, updated_at
         FROM users
         WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Insert a user together with its credential account in one transaction.
///
/// A concurrent insert of the same email surfaces as
/// [`AuthError::UserAlreadyExists`].
pub async fn create_user_with_password(
    pool: &DbPool,
    name: &str,
    email: &str,
    image: Option<&str>,
    password_hash: &str,
) -> Result<User, AuthError> {
    let mut tx = pool.begin().await?;
    let user_id = Uuid::new_v4();

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, name, email, image)
        VALUES ($1, $2, $3, $4)
        RETURNING id, name, email, email_verified, image, created_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(name)
    .bind(email)
    .bind(image)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => AuthError::UserAlreadyExists,
        other => AuthError::Database(other),
    })?;

    sqlx::query(
        r#"
        INSERT INTO accounts (id, user_id, provider_id, account_id, password)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user.id)
    .bind(CREDENTIAL_PROVIDER)
    .bind(user.id.to_string())
    .bind(password_hash)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(user)
}

/// Credential account of a user, if the user has a password.
pub async fn find_credential_account(
    pool: &DbPool,
    user_id: Uuid,
) -> Result<Option<Account>, AuthError> {
    let account = sqlx::query_as::<_, Account>(
        "SELECT id, user_id, provider_id, account_id, password, created_at, updated_at
         FROM accounts
         WHERE user_id = $1 AND provider_id = $2",
    )
    .bind(user_id)
    .bind(CREDENTIAL_PROVIDER)
    .fetch_optional(pool)
    .await?;

    Ok(account)
}

pub async fn insert_session(pool: &DbPool, new: NewSession) -> Result<Session, AuthError> {
    let session = sqlx::query_as::<_, Session>(
        r#"
        INSERT INTO sessions (id, user_id, token_hash, expires_at, ip_address, user_agent)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, user_id, token_hash, expires_at, ip_address, user_agent, created_at, updated_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(new.user_id)
    .bind(&new.token_hash)
    .bind(new.expires_at)
    .bind(&new.ip_address)
    .bind(&new.user_agent)
    .fetch_one(pool)
    .await?;

    Ok(session)
}

pub async fn find_session(pool: &DbPool, token_hash: &str) -> Result<Option<Session>, AuthError> {
    let session = sqlx::query_as::<_, Session>(
        "SELECT id, user_id, token_hash, expires_at, ip_address, user_agent, created_at, updated_at
         FROM sessions
         WHERE token_hash = $1",
    )
    .bind(token_hash)
    .fetch_optional(pool)
    .await?;

    Ok(session)
}

/// Delete a session; returns whether a row was removed.
pub async fn delete_session(pool: &DbPool, token_hash: &str) -> Result<bool, AuthError> {
    let result = sqlx::query("DELETE FROM sessions WHERE token_hash = $1")
        .bind(token_hash)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Remove every expired session; returns how many were removed.
pub async fn purge_expired_sessions(pool: &DbPool) -> Result<u64, AuthError> {
    let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= $1")
        .bind(Utc::now())
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
