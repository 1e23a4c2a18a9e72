//! HTTP request handlers (route handlers).
//!
//! `/api/auth/*` is served by [`crate::auth::bridge::handle_auth`]; everything
//! else lives here.

/// `GET /`
pub mod root;
