//! Placeholder root endpoint.

use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

/// Greeting returned by `GET /`.
#[derive(Debug, Serialize, ToSchema)]
pub struct HelloResponse {
    pub message: String,
}

/// Say hello.
///
/// # Response (200 OK)
///
/// ```json
/// { "message": "Hello World" }
/// ```
#[utoipa::path(
    get,
    path = "/",
    tag = "General",
    responses((status = 200, description = "Greeting", body = HelloResponse))
)]
pub async fn hello() -> Json<HelloResponse> {
    Json(HelloResponse {
        message: "Hello World".to_string(),
    })
}
