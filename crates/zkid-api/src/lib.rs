//! # zkid-api — Axum API Service
//!
//! The transport boundary of the ZKID stack. Maps the three protocol
//! operations onto HTTP and delegates everything to [`zkid_auth`].
//!
//! ## API Surface
//!
//! | Route                         | Module            | Operation          |
//! |-------------------------------|-------------------|--------------------|
//! | `POST /api/v1/auth/register`  | [`routes::auth`]  | Register           |
//! | `POST /api/v1/auth/challenge` | [`routes::auth`]  | RequestChallenge   |
//! | `POST /api/v1/auth/verify`    | [`routes::auth`]  | VerifyProof        |
//! | `GET /health/liveness`        | (here)            | Liveness probe     |
//! | `GET /health/readiness`       | (here)            | Readiness probe    |
//! | `GET /openapi.json`           | [`openapi`]       | OpenAPI 3.1 spec   |
//!
//! ## Crate Policy
//!
//! - No business logic in route handlers — they parse, delegate to
//!   [`zkid_auth::AuthService`], and map errors via [`AppError`].
//! - All errors become structured `{"error": {code, message}}` bodies.

pub mod error;
pub mod extractors;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::Router;
use tower_http::trace::TraceLayer;

pub use error::AppError;
pub use state::AppState;

/// Assemble the full application router.
///
/// Health probes are mounted outside the traced API router so probe
/// traffic stays out of the request logs.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::auth::router())
        .merge(openapi::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let health = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness));

    Router::new().merge(health).merge(api)
}

/// Liveness probe — 200 whenever the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe — 200 once the group is validated and routes are up.
async fn readiness() -> &'static str {
    "ready"
}
