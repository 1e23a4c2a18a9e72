//! Password hashing with Argon2id.
//!
//! Hashes are stored as PHC strings, so parameters and salt travel with them.

use std::sync::LazyLock;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use super::AuthError;

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum accepted password length, in characters.
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Hash checked when no stored hash exists, so unknown accounts cost one
/// Argon2 verification like known ones.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash("dummy password for missing accounts").ok());

/// Check password length bounds.
pub fn validate(password: &str) -> Result<(), AuthError> {
    let length = password.chars().count();
    if length < MIN_PASSWORD_LENGTH {
        return Err(AuthError::PasswordTooShort);
    }
    if length > MAX_PASSWORD_LENGTH {
        return Err(AuthError::PasswordTooLong);
    }
    Ok(())
}

pub fn hash(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::PasswordHash(e.to_string()))
}

/// `Ok(false)` on mismatch; `Err` only if the stored hash is unreadable.
pub fn verify(password: &str, stored: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(stored).map_err(|e| AuthError::PasswordHash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Run [`hash`] on the blocking pool; Argon2 is deliberately slow.
pub async fn hash_blocking(password: String) -> Result<String, AuthError> {
    tokio::task::spawn_blocking(move || hash(&password))
        .await
        .map_err(|e| AuthError::PasswordHash(e.to_string()))?
}

/// Run [`verify`] on the blocking pool.
pub async fn verify_blocking(password: String, stored: String) -> Result<bool, AuthError> {
    tokio::task::spawn_blocking(move || verify(&password, &stored))
        .await
        .map_err(|e| AuthError::PasswordHash(e.to_string()))?
}

/// Verify `password` against a throwaway hash on the blocking pool and
/// discard the result.
pub async fn verify_dummy_blocking(password: String) -> Result<(), AuthError> {
    tokio::task::spawn_blocking(move || {
        if let Some(stored) = DUMMY_HASH.as_deref() {
            let _ = verify(&password, stored);
        }
    })
    .await
    .map_err(|e| AuthError::PasswordHash(e.to_string()))
}
