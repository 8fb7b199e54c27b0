//! # Error Types — Authentication Failure Taxonomy
//!
//! The single failure vocabulary of the authentication core. All errors
//! use `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Validation failures ([`AuthError::InvalidInput`]) are raised before
//!   any cryptographic or storage work.
//! - Storage conflicts ([`AuthError::DuplicateUser`],
//!   [`AuthError::AlreadyConsumed`]) come from atomic primitives, never
//!   from check-then-act sequences.
//! - [`AuthError::InvalidProof`] is deliberately uninformative: it covers
//!   both "wrong secret" and "user never existed", and its message must
//!   never distinguish the two.

use thiserror::Error;

/// Failures of the authentication core.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Request failed validation before any state was touched.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Registration lost the insert-if-absent race or the name was taken.
    #[error("username already registered")]
    DuplicateUser,

    /// No challenge with the given identifier exists (never issued, or
    /// already swept).
    #[error("challenge not found")]
    UnknownChallenge,

    /// The challenge's TTL has elapsed.
    #[error("challenge expired")]
    ExpiredChallenge,

    /// The challenge was already consumed by an earlier verify attempt.
    #[error("challenge already consumed")]
    AlreadyConsumed,

    /// Proof verification failed. Identical for a wrong response on a
    /// real user and for any response against a fabricated identity.
    #[error("proof verification failed")]
    InvalidProof,

    /// Resource exhaustion or an unexpected storage/crypto failure.
    /// Surfaced as a generic failure; the core never retries.
    #[error("internal error: {0}")]
    Internal(String),
}
