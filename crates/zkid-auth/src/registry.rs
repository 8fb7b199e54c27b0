//! # User Registry
//!
//! Maps a username to its registered Schnorr public key and auxiliary
//! salt. Registration is an atomic insert-if-absent on the entry; records
//! are immutable once written and there is no deletion path.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use num_bigint::BigUint;
use uuid::Uuid;
use zkid_core::{AuthError, Username};
use zkid_crypto::SchnorrGroup;

/// A registered account. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// Internal record identifier.
    pub id: Uuid,
    /// The unique account name.
    pub username: Username,
    /// Schnorr public key `Y = g^x mod p`, validated as a group element.
    pub public_key_y: BigUint,
    /// Opaque client-supplied auxiliary bytes.
    pub salt: String,
    /// Registration time.
    pub created_at: DateTime<Utc>,
}

/// Concurrent username → [`UserRecord`] map.
///
/// Cheap to share via `Arc`; all operations lock only the owning shard.
#[derive(Debug)]
pub struct UserRegistry {
    group: Arc<SchnorrGroup>,
    users: DashMap<Username, UserRecord>,
}

impl UserRegistry {
    /// Create an empty registry over the given group.
    pub fn new(group: Arc<SchnorrGroup>) -> Self {
        Self {
            group,
            users: DashMap::new(),
        }
    }

    /// Register a new account.
    ///
    /// The public key must be a subgroup element in `(1, p-1)`; the salt
    /// must be non-empty. Exactly one of any number of concurrent
    /// registrations for the same name succeeds — the insert is a single
    /// atomic step on the entry, not a check followed by a write.
    ///
    /// # Errors
    ///
    /// - [`AuthError::InvalidInput`] before any storage work if the key
    ///   or salt fail validation.
    /// - [`AuthError::DuplicateUser`] if the name is already taken.
    pub fn register(
        &self,
        username: Username,
        public_key_y: BigUint,
        salt: String,
    ) -> Result<UserRecord, AuthError> {
        if !self.group.is_element(&public_key_y) {
            return Err(AuthError::InvalidInput(
                "public key is not a valid group element".to_string(),
            ));
        }
        if salt.is_empty() {
            return Err(AuthError::InvalidInput(
                "salt must not be empty".to_string(),
            ));
        }

        match self.users.entry(username.clone()) {
            Entry::Occupied(_) => Err(AuthError::DuplicateUser),
            Entry::Vacant(slot) => {
                let record = UserRecord {
                    id: Uuid::new_v4(),
                    username,
                    public_key_y,
                    salt,
                    created_at: Utc::now(),
                };
                slot.insert(record.clone());
                Ok(record)
            }
        }
    }

    /// Look up an account by name. Pure read, no side effects.
    pub fn lookup(&self, username: &Username) -> Option<UserRecord> {
        self.users.get(username).map(|r| r.clone())
    }

    /// Number of registered accounts.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
