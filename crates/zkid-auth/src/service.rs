//! # Authentication Service — Orchestration and State Machine
//!
//! Ties the registry, challenge store, verifier, and token issuer into
//! the three protocol operations. Owns the two security policies the
//! stores cannot express on their own:
//!
//! - **Anti-enumeration** — a challenge request for an unknown username
//!   is served from a fabricated public key derived deterministically
//!   from the name, so the response shape and cost never reveal whether
//!   the account exists.
//! - **Replay** — a challenge is consumed on the first verify *attempt*,
//!   not the first success. A mistyped proof burns the challenge; the
//!   client requests a fresh one.
//!
//! Per-challenge state machine:
//! `Issued → {VerifiedSuccess, VerifiedFailure, Expired}` — only the
//! first transition out of `Issued` is honored.

use std::sync::Arc;

use chrono::Utc;
use num_bigint::BigUint;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use zkid_core::{AuthError, ChallengeId, Username};
use zkid_crypto::{parse_element_hex, schnorr, SchnorrGroup};

use crate::challenge::{ChallengeStore, ConsumeOutcome};
use crate::config::{AuthConfig, FailurePolicy};
use crate::events::{AuthEvent, EventSink};
use crate::registry::{UserRecord, UserRegistry};
use crate::token::{IssuedToken, TokenIssuer};

/// Response to a challenge request. Identical shape whether or not the
/// username names a registered account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeGrant {
    /// Identifier to present at verification.
    pub challenge_id: ChallengeId,
    /// The challenge scalar `c`, reduced mod `q`.
    pub challenge_scalar: BigUint,
    /// Seconds until the challenge expires.
    pub expires_in: u64,
}

/// The authentication core.
///
/// Stateless per request over two pieces of shared state (registry and
/// challenge store); all operations are synchronous and safe to call
/// from any number of threads.
pub struct AuthService {
    group: Arc<SchnorrGroup>,
    registry: UserRegistry,
    challenges: Arc<ChallengeStore>,
    issuer: Arc<dyn TokenIssuer>,
    events: Arc<dyn EventSink>,
    config: AuthConfig,
    /// Per-process secret keying the fabricated-identity derivation.
    decoy_key: [u8; 32],
}

impl AuthService {
    /// Assemble a service over a validated group.
    pub fn new(
        group: Arc<SchnorrGroup>,
        config: AuthConfig,
        issuer: Arc<dyn TokenIssuer>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        let mut decoy_key = [0u8; 32];
        OsRng.fill_bytes(&mut decoy_key);
        Self {
            registry: UserRegistry::new(Arc::clone(&group)),
            challenges: Arc::new(ChallengeStore::new(
                config.challenge_ttl,
                config.challenge_retention,
            )),
            group,
            issuer,
            events,
            config,
            decoy_key,
        }
    }

    /// The challenge store, for wiring up the background sweeper.
    pub fn challenges(&self) -> Arc<ChallengeStore> {
        Arc::clone(&self.challenges)
    }

    /// The active configuration.
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Register a public commitment for a new account.
    pub fn register(
        &self,
        username: &str,
        public_key_y_hex: &str,
        salt: &str,
    ) -> Result<UserRecord, AuthError> {
        let username = Username::with_limit(username, self.config.max_username_len)?;
        let public_key_y = parse_element_hex(public_key_y_hex)
            .map_err(|e| AuthError::InvalidInput(format!("public key: {e}")))?;

        let record = self
            .registry
            .register(username, public_key_y, salt.to_string())?;
        self.events.publish(&AuthEvent::UserRegistered {
            user_id: record.id,
            username: record.username.to_string(),
            at: record.created_at,
        });
        tracing::info!(username = %record.username, "user registered");
        Ok(record)
    }

    /// Issue a challenge bound to the supplied commitment and identity.
    ///
    /// Never discloses whether the username is registered: unknown names
    /// get a challenge derived from a fabricated public key, with the
    /// same fields and the same arithmetic cost as a real one.
    pub fn request_challenge(
        &self,
        username: &str,
        commitment_r_hex: &str,
    ) -> Result<ChallengeGrant, AuthError> {
        let username = Username::with_limit(username, self.config.max_username_len)?;
        let commitment_r = parse_element_hex(commitment_r_hex)
            .map_err(|e| AuthError::InvalidInput(format!("commitment: {e}")))?;
        if !self.group.is_element(&commitment_r) {
            return Err(AuthError::InvalidInput(
                "commitment is not a valid group element".to_string(),
            ));
        }

        let public_key_y = self.resolve_public_key(&username);
        let scalar = schnorr::derive_challenge(
            &self.group,
            &commitment_r,
            &public_key_y,
            username.as_str(),
        );
        let challenge = self
            .challenges
            .create(username, commitment_r, scalar, Utc::now());

        tracing::debug!(challenge_id = %challenge.id, "challenge issued");
        Ok(ChallengeGrant {
            challenge_id: challenge.id,
            challenge_scalar: challenge.challenge_scalar,
            expires_in: self.config.challenge_ttl.num_seconds().max(0) as u64,
        })
    }

    /// Verify a proof against a stored challenge and issue a token.
    ///
    /// The challenge is consumed before the proof is checked; whatever
    /// the outcome, it cannot be tried again.
    pub fn verify_proof(
        &self,
        username: &str,
        challenge_id: &str,
        response_s_hex: &str,
        commitment_r_hex: Option<&str>,
    ) -> Result<IssuedToken, AuthError> {
        // Input validation precedes any storage work; a malformed request
        // does not burn the challenge.
        let username = Username::with_limit(username, self.config.max_username_len)?;
        let response_s = parse_element_hex(response_s_hex)
            .map_err(|e| AuthError::InvalidInput(format!("response: {e}")))?;
        let commitment_r = commitment_r_hex
            .map(parse_element_hex)
            .transpose()
            .map_err(|e| AuthError::InvalidInput(format!("commitment: {e}")))?;

        match self.verify_inner(&username, challenge_id, &response_s, commitment_r.as_ref()) {
            Ok(token) => {
                self.events.publish(&AuthEvent::LoginSucceeded {
                    username: username.to_string(),
                    at: Utc::now(),
                });
                tracing::info!(%username, "proof verified, token issued");
                Ok(token)
            }
            Err(err) => {
                self.events.publish(&AuthEvent::LoginFailed {
                    username: username.to_string(),
                    reason: err.to_string(),
                    at: Utc::now(),
                });
                tracing::info!(%username, error = %err, "verification failed");
                Err(self.redact(err))
            }
        }
    }

    fn verify_inner(
        &self,
        username: &Username,
        challenge_id: &str,
        response_s: &BigUint,
        commitment_r: Option<&BigUint>,
    ) -> Result<IssuedToken, AuthError> {
        // An unparseable id can never have been issued.
        let id: ChallengeId = challenge_id
            .parse()
            .map_err(|_| AuthError::UnknownChallenge)?;
        let challenge = self.challenges.get(&id).ok_or(AuthError::UnknownChallenge)?;

        if challenge.is_expired(Utc::now()) {
            return Err(AuthError::ExpiredChallenge);
        }

        match self.challenges.consume(&id) {
            ConsumeOutcome::NotFound => return Err(AuthError::UnknownChallenge),
            ConsumeOutcome::Already => return Err(AuthError::AlreadyConsumed),
            ConsumeOutcome::Ok => {}
        }

        // From here on the challenge is burned; every failure is the
        // uniform InvalidProof.
        if challenge.bound_username != *username {
            return Err(AuthError::InvalidProof);
        }
        if let Some(r) = commitment_r {
            if *r != challenge.commitment_r {
                return Err(AuthError::InvalidProof);
            }
        }

        let public_key_y = self.resolve_public_key(username);
        let valid = schnorr::verify(
            &self.group,
            &challenge.commitment_r,
            &public_key_y,
            &challenge.challenge_scalar,
            response_s,
        );
        if !valid {
            return Err(AuthError::InvalidProof);
        }

        self.issuer.issue(username)
    }

    /// The public key verification runs against: the registered one, or
    /// a fabricated stand-in for unknown names.
    ///
    /// The decoy is derived unconditionally so known and unknown names
    /// cost the same one exponentiation per request.
    fn resolve_public_key(&self, username: &Username) -> BigUint {
        let decoy = self.decoy_public_key(username);
        match self.registry.lookup(username) {
            Some(user) => user.public_key_y,
            None => decoy,
        }
    }

    /// Deterministic fabricated public key for an unknown username:
    /// `g^(H(decoy_key || name) mod q) mod p`.
    ///
    /// Keyed on a per-process random secret, so the exponent — and with
    /// it any accepting response — is unpredictable to clients, while
    /// repeated probes for the same name within a process behave
    /// consistently.
    fn decoy_public_key(&self, username: &Username) -> BigUint {
        let mut hasher = Sha256::new();
        hasher.update(self.decoy_key);
        hasher.update(username.as_str().as_bytes());
        let exponent =
            (BigUint::from_bytes_be(&hasher.finalize()) % self.group.q())
                .max(BigUint::from(2u32));
        self.group.g().modpow(&exponent, self.group.p())
    }

    /// Apply the configured failure-disclosure policy.
    fn redact(&self, err: AuthError) -> AuthError {
        match (self.config.failure_policy, err) {
            (FailurePolicy::Distinct, err) => err,
            (
                FailurePolicy::Opaque,
                AuthError::UnknownChallenge
                | AuthError::ExpiredChallenge
                | AuthError::AlreadyConsumed
                | AuthError::InvalidProof,
            ) => AuthError::InvalidProof,
            (FailurePolicy::Opaque, other) => other,
        }
    }
}
