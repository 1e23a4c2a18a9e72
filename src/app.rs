//! Router construction.
//!
//! Kept apart from `main` so tests can build the exact production router
//! around a stub [`AuthHandler`].

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header, header::InvalidHeaderValue},
    routing::get,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::{AuthHandler, bridge};
use crate::handlers;
use crate::openapi::ApiDoc;

/// Path prefix owned by the authentication provider.
pub const AUTH_BASE_PATH: &str = "/api/auth";

/// State shared with every handler.
///
/// The provider is built once at startup and injected here.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<dyn AuthHandler>,
}

impl AppState {
    pub fn new(auth: Arc<dyn AuthHandler>) -> Self {
        Self { auth }
    }
}

/// CORS policy allowing exactly one browser origin, with credentials.
pub fn cors_layer(origin: &str) -> Result<CorsLayer, InvalidHeaderValue> {
    Ok(CorsLayer::new()
        .allow_origin([HeaderValue::from_str(origin)?])
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::COOKIE]))
}

/// Build the HTTP router.
///
/// # Routes
///
/// - `GET /` - greeting
/// - `GET /swagger.json` - OpenAPI document
/// - `GET /docs` - Swagger UI
/// - `GET|POST /api/auth/{*path}` - bridged to the authentication provider
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/", get(handlers::root::hello))
        .route(
            &format!("{}/{{*path}}", AUTH_BASE_PATH),
            get(bridge::handle_auth)
                .post(bridge::handle_auth)
                .layer(DefaultBodyLimit::max(bridge::MAX_BODY_BYTES)),
        )
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/swagger.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
