//! # OpenAPI Specification Assembly
//!
//! Assembles the utoipa-documented routes into a single OpenAPI spec
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "ZKID API — Schnorr Zero-Knowledge Login",
        version = "0.1.0",
        description = "Password-less authentication: register a Schnorr public key, request a single-use challenge, prove knowledge of the secret, receive a session token.",
        license(name = "MIT")
    ),
    paths(
        crate::routes::auth::register,
        crate::routes::auth::challenge,
        crate::routes::auth::verify,
    ),
    components(schemas(
        crate::routes::auth::RegisterRequest,
        crate::routes::auth::ChallengeRequest,
        crate::routes::auth::ChallengeResponse,
        crate::routes::auth::VerifyRequest,
        crate::routes::auth::AuthResponse,
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "auth", description = "Schnorr identification protocol operations")
    )
)]
pub struct ApiDoc;

/// Router serving the spec.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json — the assembled spec.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
