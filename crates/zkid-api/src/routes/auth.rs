//! # Authentication Routes
//!
//! The three protocol operations. Wire field names are camelCase and
//! group elements travel as unpadded hex strings, matching the deployed
//! clients.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use zkid_crypto::element_to_hex;

use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::state::AppState;

/// Registration request.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Account name to register.
    pub username: String,
    /// Schnorr public key `Y = g^x mod p`, hex-encoded.
    pub public_key_y: String,
    /// Opaque client-side salt.
    pub salt: String,
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<(), String> {
        if self.username.trim().is_empty() {
            return Err("username must not be empty".to_string());
        }
        if self.public_key_y.trim().is_empty() {
            return Err("publicKeyY must not be empty".to_string());
        }
        if self.salt.trim().is_empty() {
            return Err("salt must not be empty".to_string());
        }
        Ok(())
    }
}

/// Challenge request carrying the client's fresh commitment.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeRequest {
    /// Account name to authenticate (registered or not — the response
    /// shape does not differ).
    pub username: String,
    /// Commitment `R = g^r mod p`, hex-encoded.
    pub client_r: String,
}

impl Validate for ChallengeRequest {
    fn validate(&self) -> Result<(), String> {
        if self.username.trim().is_empty() {
            return Err("username must not be empty".to_string());
        }
        if self.client_r.trim().is_empty() {
            return Err("clientR must not be empty".to_string());
        }
        Ok(())
    }
}

/// Issued challenge.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeResponse {
    /// Identifier to present at verification.
    pub challenge_id: String,
    /// Challenge scalar `c`, hex-encoded.
    pub c: String,
    /// Seconds until the challenge expires.
    pub expires_in: u64,
}

/// Proof submission.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    /// Account name the challenge was requested for.
    pub username: String,
    /// Identifier returned by the challenge endpoint.
    pub challenge_id: String,
    /// Response scalar `s = r + c·x mod q`, hex-encoded.
    pub s: String,
    /// Optional echo of the commitment; a mismatch with the stored value
    /// fails verification.
    #[serde(default)]
    pub client_r: Option<String>,
}

impl Validate for VerifyRequest {
    fn validate(&self) -> Result<(), String> {
        if self.username.trim().is_empty() {
            return Err("username must not be empty".to_string());
        }
        if self.challenge_id.trim().is_empty() {
            return Err("challengeId must not be empty".to_string());
        }
        if self.s.trim().is_empty() {
            return Err("s must not be empty".to_string());
        }
        Ok(())
    }
}

/// Successful login.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    /// Session bearer token.
    pub token: String,
    /// Token scheme, always `"Bearer"`.
    pub token_type: String,
    /// The authenticated account.
    pub username: String,
    /// Token lifetime in seconds.
    pub expires_in: u64,
}

/// Build the authentication router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/auth/register", post(register))
        .route("/api/v1/auth/challenge", post(challenge))
        .route("/api/v1/auth/verify", post(verify))
}

/// POST /api/v1/auth/register — register a public commitment.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered"),
        (status = 400, description = "Invalid input", body = crate::error::ErrorBody),
        (status = 409, description = "Username taken", body = crate::error::ErrorBody),
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let req = extract_validated_json(body)?;
    state
        .auth
        .register(&req.username, &req.public_key_y, &req.salt)?;
    Ok(StatusCode::CREATED)
}

/// POST /api/v1/auth/challenge — request a login challenge.
#[utoipa::path(
    post,
    path = "/api/v1/auth/challenge",
    request_body = ChallengeRequest,
    responses(
        (status = 200, description = "Challenge issued", body = ChallengeResponse),
        (status = 400, description = "Invalid input", body = crate::error::ErrorBody),
    ),
    tag = "auth"
)]
pub async fn challenge(
    State(state): State<AppState>,
    body: Result<Json<ChallengeRequest>, JsonRejection>,
) -> Result<Json<ChallengeResponse>, AppError> {
    let req = extract_validated_json(body)?;
    let grant = state.auth.request_challenge(&req.username, &req.client_r)?;
    Ok(Json(ChallengeResponse {
        challenge_id: grant.challenge_id.to_string(),
        c: element_to_hex(&grant.challenge_scalar),
        expires_in: grant.expires_in,
    }))
}

/// POST /api/v1/auth/verify — submit a proof, receive a session token.
#[utoipa::path(
    post,
    path = "/api/v1/auth/verify",
    request_body = VerifyRequest,
    responses(
        (status = 200, description = "Proof accepted, token issued", body = AuthResponse),
        (status = 400, description = "Invalid input", body = crate::error::ErrorBody),
        (status = 401, description = "Authentication failed", body = crate::error::ErrorBody),
    ),
    tag = "auth"
)]
pub async fn verify(
    State(state): State<AppState>,
    body: Result<Json<VerifyRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, AppError> {
    let req = extract_validated_json(body)?;
    let token = state.auth.verify_proof(
        &req.username,
        &req.challenge_id,
        &req.s,
        req.client_r.as_deref(),
    )?;
    Ok(Json(AuthResponse {
        token: token.token,
        token_type: token.token_type,
        username: req.username,
        expires_in: token.expires_in,
    }))
}
