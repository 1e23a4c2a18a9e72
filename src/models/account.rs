//! Credential account model.
//!
//! An account links a user to one way of signing in. Only the `credential`
//! provider (email + password) exists today.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Provider id stored for email/password accounts.
pub const CREDENTIAL_PROVIDER: &str = "credential";

/// Represents an account record from the database.
///
/// # Database Table
///
/// Maps to the `accounts` table. `(provider_id, account_id)` is unique.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Account {
    pub id: Uuid,

    /// User this account signs in as
    pub user_id: Uuid,

    /// Sign-in method, e.g. `credential`
    pub provider_id: String,

    /// Identifier within the provider; the user id for credential accounts
    pub account_id: String,

    /// Argon2 PHC string. Never leaves the server.
    pub password: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
