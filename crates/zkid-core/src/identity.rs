//! # Identity Newtypes
//!
//! Domain-primitive newtypes for the identifiers used throughout the
//! stack. A [`Username`] cannot be passed where a [`ChallengeId`] is
//! expected, and neither is a bare string.
//!
//! ## Validation
//!
//! [`Username`] validates at construction time: not blank, at most
//! [`MAX_USERNAME_LEN`] characters (callers may tighten the bound).
//! [`ChallengeId`] is UUID-based and always valid by construction.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AuthError;

/// Default upper bound on username length, in characters.
pub const MAX_USERNAME_LEN: usize = 64;

// ---------------------------------------------------------------------------
// Username
// ---------------------------------------------------------------------------

/// A registered (or requested) account name.
///
/// Construction validates the raw string; a `Username` value is always
/// well-formed. The inner string is stored exactly as supplied — no
/// trimming or case folding, since the challenge scalar derivation hashes
/// the name byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Validate and wrap a raw username with the default length bound.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidInput`] if the name is blank or longer
    /// than [`MAX_USERNAME_LEN`] characters.
    pub fn new(raw: &str) -> Result<Self, AuthError> {
        Self::with_limit(raw, MAX_USERNAME_LEN)
    }

    /// Validate and wrap a raw username with an explicit length bound.
    pub fn with_limit(raw: &str, max_len: usize) -> Result<Self, AuthError> {
        if raw.trim().is_empty() {
            return Err(AuthError::InvalidInput(
                "username must not be blank".to_string(),
            ));
        }
        let len = raw.chars().count();
        if len > max_len {
            return Err(AuthError::InvalidInput(format!(
                "username exceeds {max_len} characters (got {len})"
            )));
        }
        Ok(Self(raw.to_string()))
    }

    /// Access the underlying string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// ChallengeId
// ---------------------------------------------------------------------------

/// Opaque identifier for an issued authentication challenge.
///
/// Backed by a v4 UUID drawn from the OS CSPRNG: unguessable, with
/// negligible collision probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChallengeId(Uuid);

impl ChallengeId {
    /// Allocate a fresh random challenge identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ChallengeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ChallengeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ChallengeId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}
