//! Data models representing database entities.
//!
//! These tables belong to the authentication provider.

/// Credential account model
pub mod account;
/// Session model
pub mod session;
/// User model
pub mod user;
