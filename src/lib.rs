//! Hello Auth API
//!
//! A small REST API with email/password authentication.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: PostgreSQL with sqlx, used by the authentication provider
//! - **Authentication**: email/password provider mounted under `/api/auth/*`
//!   through a request bridge
//! - **Documentation**: OpenAPI via utoipa, Swagger UI at `/docs`
//! - **Format**: JSON requests/responses

pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod openapi;
