//! OpenAPI documents.
//!
//! [`ApiDoc`] is served at `/swagger.json` and rendered by Swagger UI at
//! `/docs`. [`AuthApiDoc`] covers only the provider's routes; it is nested
//! into [`ApiDoc`] under `/api/auth` and also served by the provider itself.

use utoipa::OpenApi;

use crate::auth::AuthErrorBody;
use crate::auth::endpoints::{
    OkResponse, SessionWithUser, SignInEmailBody, SignInResponse, SignOutResponse,
    SignUpEmailBody, SignUpResponse,
};
use crate::error::AuthFailureBody;
use crate::handlers::root::HelloResponse;
use crate::models::session::SessionResponse;
use crate::models::user::UserResponse;

#[derive(OpenApi)]
#[openapi(
    paths(crate::handlers::root::hello),
    components(schemas(HelloResponse, AuthFailureBody)),
    nest(
        (path = "/api/auth", api = AuthApiDoc)
    ),
    tags(
        (name = "General", description = "Placeholder endpoints"),
        (name = "Authentication", description = "Email and password sign-up, sign-in and sessions"),
    ),
    info(
        title = "Hello Auth API",
        version = "0.1.0",
        description = "Minimal API with email/password authentication"
    )
)]
pub struct ApiDoc;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::auth::endpoints::ok,
        crate::auth::endpoints::sign_up_email,
        crate::auth::endpoints::sign_in_email,
        crate::auth::endpoints::sign_out,
        crate::auth::endpoints::get_session,
        crate::auth::endpoints::generate_schema,
    ),
    components(
        schemas(
            AuthErrorBody,
            OkResponse,
            SessionResponse,
            SessionWithUser,
            SignInEmailBody,
            SignInResponse,
            SignOutResponse,
            SignUpEmailBody,
            SignUpResponse,
            UserResponse,
        )
    ),
    tags(
        (name = "Authentication", description = "Email and password sign-up, sign-in and sessions"),
    ),
    info(title = "Authentication", version = "0.1.0")
)]
pub struct AuthApiDoc;
