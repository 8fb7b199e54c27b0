//! HTTP contract tests for the authentication API.
//!
//! Exercises the full wire protocol against the production RFC 3526
//! group: registration, challenge issuance, proof verification, replay
//! refusal, enumeration resistance, and input validation.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use num_bigint::BigUint;
use serde_json::json;
use tower::ServiceExt;

use zkid_api::state::AppState;
use zkid_auth::{AuthConfig, AuthService, HmacTokenIssuer, TracingEventSink};
use zkid_crypto::{element_to_hex, parse_element_hex, SchnorrGroup};

fn group() -> Arc<SchnorrGroup> {
    Arc::new(SchnorrGroup::rfc3526_1536())
}

fn test_app() -> axum::Router {
    let service = AuthService::new(
        group(),
        AuthConfig::default(),
        Arc::new(HmacTokenIssuer::with_random_key()),
        Arc::new(TracingEventSink),
    );
    zkid_api::app(AppState::new(Arc::new(service)))
}

/// POST helper with JSON body.
fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

/// GET helper.
fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// Read response body as JSON Value.
async fn body_json(response: axum::http::Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Client-side keypair and registration over the wire.
async fn register_user(app: &axum::Router, username: &str, x: &BigUint) -> BigUint {
    let group = group();
    let y = group.g().modpow(x, group.p());
    let resp = app
        .clone()
        .oneshot(post_json(
            "/api/v1/auth/register",
            json!({
                "username": username,
                "publicKeyY": element_to_hex(&y),
                "salt": "0123456789abcdef",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    y
}

/// Request a challenge over the wire, returning (challengeId, c, R).
async fn request_challenge(
    app: &axum::Router,
    username: &str,
    r: &BigUint,
) -> (String, BigUint, BigUint) {
    let group = group();
    let big_r = group.g().modpow(r, group.p());
    let resp = app
        .clone()
        .oneshot(post_json(
            "/api/v1/auth/challenge",
            json!({ "username": username, "clientR": element_to_hex(&big_r) }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let v = body_json(resp).await;
    let challenge_id = v["challengeId"].as_str().unwrap().to_string();
    let c = parse_element_hex(v["c"].as_str().unwrap()).unwrap();
    assert_eq!(v["expiresIn"].as_u64().unwrap(), 300);
    (challenge_id, c, big_r)
}

#[tokio::test]
async fn health_probes_respond() {
    let app = test_app();
    let live = app.clone().oneshot(get("/health/liveness")).await.unwrap();
    assert_eq!(live.status(), StatusCode::OK);
    let ready = app.clone().oneshot(get("/health/readiness")).await.unwrap();
    assert_eq!(ready.status(), StatusCode::OK);
}

#[tokio::test]
async fn openapi_spec_is_served() {
    let app = test_app();
    let resp = app.oneshot(get("/openapi.json")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let v = body_json(resp).await;
    assert!(v["paths"]["/api/v1/auth/verify"].is_object());
}

#[tokio::test]
async fn full_login_flow_end_to_end() {
    let app = test_app();
    let group = group();
    let x = BigUint::from(12345u32);
    register_user(&app, "alice", &x).await;

    let r = BigUint::from(67890u32);
    let (challenge_id, c, big_r) = request_challenge(&app, "alice", &r).await;

    let s = (&r + &c * &x) % group.q();
    let resp = app
        .clone()
        .oneshot(post_json(
            "/api/v1/auth/verify",
            json!({
                "username": "alice",
                "challengeId": challenge_id,
                "s": element_to_hex(&s),
                "clientR": element_to_hex(&big_r),
            }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let v = body_json(resp).await;
    assert_eq!(v["tokenType"], "Bearer");
    assert_eq!(v["username"], "alice");
    assert!(v["token"].as_str().unwrap().contains('.'));
    assert_eq!(v["expiresIn"].as_u64().unwrap(), 86_400);
}

#[tokio::test]
async fn replay_is_refused_with_distinct_code() {
    let app = test_app();
    let group = group();
    let x = BigUint::from(12345u32);
    register_user(&app, "alice", &x).await;

    let r = BigUint::from(67890u32);
    let (challenge_id, c, _) = request_challenge(&app, "alice", &r).await;
    let s = element_to_hex(&((&r + &c * &x) % group.q()));
    let payload = json!({
        "username": "alice",
        "challengeId": challenge_id,
        "s": s,
    });

    let first = app
        .clone()
        .oneshot(post_json("/api/v1/auth/verify", payload.clone()))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    // Identical, still-valid proof: refused as a replay.
    let second = app
        .clone()
        .oneshot(post_json("/api/v1/auth/verify", payload))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::UNAUTHORIZED);
    let v = body_json(second).await;
    assert_eq!(v["error"]["code"], "CHALLENGE_CONSUMED");
    assert_eq!(v["error"]["message"], "Authentication failed");
}

#[tokio::test]
async fn wrong_proof_is_unauthorized() {
    let app = test_app();
    let group = group();
    register_user(&app, "alice", &BigUint::from(12345u32)).await;

    let r = BigUint::from(67890u32);
    let (challenge_id, c, _) = request_challenge(&app, "alice", &r).await;
    // Proof for the wrong secret.
    let s = element_to_hex(&((&r + &c * &BigUint::from(99999u32)) % group.q()));

    let resp = app
        .clone()
        .oneshot(post_json(
            "/api/v1/auth/verify",
            json!({ "username": "alice", "challengeId": challenge_id, "s": s }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let v = body_json(resp).await;
    assert_eq!(v["error"]["code"], "AUTH_FAILED");
}

#[tokio::test]
async fn unknown_challenge_is_unauthorized() {
    let app = test_app();
    let resp = app
        .clone()
        .oneshot(post_json(
            "/api/v1/auth/verify",
            json!({
                "username": "alice",
                "challengeId": "00000000-0000-4000-8000-000000000000",
                "s": "5",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let v = body_json(resp).await;
    assert_eq!(v["error"]["code"], "CHALLENGE_UNKNOWN");
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let app = test_app();
    let x = BigUint::from(12345u32);
    register_user(&app, "alice", &x).await;

    let group = group();
    let y = group.g().modpow(&x, group.p());
    let resp = app
        .clone()
        .oneshot(post_json(
            "/api/v1/auth/register",
            json!({
                "username": "alice",
                "publicKeyY": element_to_hex(&y),
                "salt": "feedface",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let v = body_json(resp).await;
    assert_eq!(v["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn register_validation_rejects_bad_inputs() {
    let app = test_app();
    let cases = [
        json!({ "username": "", "publicKeyY": "abcd", "salt": "s" }),
        json!({ "username": "alice", "publicKeyY": "", "salt": "s" }),
        json!({ "username": "alice", "publicKeyY": "not-hex!!!", "salt": "s" }),
        json!({ "username": "a".repeat(100), "publicKeyY": "abcd", "salt": "s" }),
    ];
    for payload in cases {
        let resp = app
            .clone()
            .oneshot(post_json("/api/v1/auth/register", payload.clone()))
            .await
            .unwrap();
        assert_eq!(
            resp.status(),
            StatusCode::BAD_REQUEST,
            "payload: {payload}"
        );
        let v = body_json(resp).await;
        assert_eq!(v["error"]["code"], "BAD_REQUEST");
    }
}

#[tokio::test]
async fn degenerate_public_key_rejected() {
    let app = test_app();
    let group = group();
    let p_minus_one = element_to_hex(&(group.p() - BigUint::from(1u32)));
    for bad in ["0", "1", p_minus_one.as_str()] {
        let resp = app
            .clone()
            .oneshot(post_json(
                "/api/v1/auth/register",
                json!({ "username": "eve", "publicKeyY": bad, "salt": "s" }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "Y = {bad}");
    }
}

#[tokio::test]
async fn missing_fields_are_bad_requests() {
    let app = test_app();
    let resp = app
        .clone()
        .oneshot(post_json("/api/v1/auth/register", json!({ "username": "a" })))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn challenge_shape_identical_for_unknown_user() {
    let app = test_app();
    register_user(&app, "alice", &BigUint::from(777u32)).await;

    let r = BigUint::from(31337u32);
    let group = group();
    let big_r = element_to_hex(&group.g().modpow(&r, group.p()));

    let mut shapes = Vec::new();
    for username in ["alice", "never_registered_anywhere"] {
        let resp = app
            .clone()
            .oneshot(post_json(
                "/api/v1/auth/challenge",
                json!({ "username": username, "clientR": &big_r }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let v = body_json(resp).await;
        let mut keys: Vec<String> = v.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        shapes.push(keys);
        // The scalar parses and is in range either way.
        let c = parse_element_hex(v["c"].as_str().unwrap()).unwrap();
        assert!(&c < group.q());
    }
    assert_eq!(shapes[0], shapes[1]);
}

#[tokio::test]
async fn unknown_user_proof_fails_like_wrong_proof() {
    let app = test_app();
    let group = group();
    let r = BigUint::from(4242u32);
    let (challenge_id, c, _) = request_challenge(&app, "ghost", &r).await;

    // The "prover" guesses a secret; the decoy key makes success
    // cryptographically unreachable.
    let s = element_to_hex(&((&r + &c * &BigUint::from(1u32)) % group.q()));
    let resp = app
        .clone()
        .oneshot(post_json(
            "/api/v1/auth/verify",
            json!({ "username": "ghost", "challengeId": challenge_id, "s": s }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let v = body_json(resp).await;
    assert_eq!(v["error"]["code"], "AUTH_FAILED");
}

#[tokio::test]
async fn commitment_echo_mismatch_fails() {
    let app = test_app();
    let group = group();
    let x = BigUint::from(555u32);
    register_user(&app, "alice", &x).await;

    let r = BigUint::from(666u32);
    let (challenge_id, c, _) = request_challenge(&app, "alice", &r).await;
    let s = element_to_hex(&((&r + &c * &x) % group.q()));

    let resp = app
        .clone()
        .oneshot(post_json(
            "/api/v1/auth/verify",
            json!({
                "username": "alice",
                "challengeId": challenge_id,
                "s": s,
                "clientR": "deadbeef",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let v = body_json(resp).await;
    assert_eq!(v["error"]["code"], "AUTH_FAILED");
}
