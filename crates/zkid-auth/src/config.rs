//! # Service Configuration
//!
//! Tunable policy for the authentication core. Defaults match the
//! deployed protocol: 300 s challenge TTL, 60 s post-expiry retention,
//! 64-character usernames, distinct failure outcomes.

use chrono::Duration;

/// How verification failures caused by challenge lifecycle (expiry,
/// replay, unknown id) are disclosed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Report `ExpiredChallenge` / `AlreadyConsumed` / `UnknownChallenge`
    /// as themselves. Clients can tell a stale login from a wrong proof.
    #[default]
    Distinct,
    /// Collapse every verification failure into `InvalidProof`. Trades
    /// client usability for a smaller side channel.
    Opaque,
}

/// Configuration for [`AuthService`](crate::AuthService) and its stores.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// How long an issued challenge stays verifiable.
    pub challenge_ttl: Duration,
    /// How long an expired or consumed challenge is retained so a late
    /// second attempt can still be answered `AlreadyConsumed` rather
    /// than `UnknownChallenge`.
    pub challenge_retention: Duration,
    /// Interval between background sweep passes.
    pub sweep_interval: std::time::Duration,
    /// Maximum username length, in characters.
    pub max_username_len: usize,
    /// Failure disclosure policy for `verify_proof`.
    pub failure_policy: FailurePolicy,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            challenge_ttl: Duration::seconds(300),
            challenge_retention: Duration::seconds(60),
            sweep_interval: std::time::Duration::from_secs(30),
            max_username_len: zkid_core::MAX_USERNAME_LEN,
            failure_policy: FailurePolicy::Distinct,
        }
    }
}
