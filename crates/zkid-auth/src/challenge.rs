//! # Challenge Store
//!
//! Single-use challenge state keyed by an unguessable [`ChallengeId`].
//! The store is a sharded concurrent map: consumption is a compare-and-set
//! on the entry under its own shard lock, so unrelated challenges never
//! contend and exactly one of any number of racing verify calls wins.
//!
//! Expired entries are retained for a short window after their TTL so a
//! late second attempt is answered `Already` instead of `NotFound`, then
//! removed by the background sweeper.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use num_bigint::BigUint;
use zkid_core::{ChallengeId, Username};

/// One issued authentication challenge.
///
/// `bound_username` may name a real or a fabricated identity; the store
/// does not know or care which. Mutated only by [`ChallengeStore::consume`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    /// Unique opaque identifier.
    pub id: ChallengeId,
    /// The identity the challenge was issued for (real or fabricated).
    pub bound_username: Username,
    /// The client's commitment `R = g^r mod p`.
    pub commitment_r: BigUint,
    /// The derived challenge scalar `c`, already reduced mod `q`.
    pub challenge_scalar: BigUint,
    /// Issuance time.
    pub issued_at: DateTime<Utc>,
    /// End of the verification window.
    pub expires_at: DateTime<Utc>,
    /// Set exactly once by the first verify attempt.
    pub consumed: bool,
}

impl Challenge {
    /// Whether the verification window has closed at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Outcome of an atomic consume attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumeOutcome {
    /// This caller won the race; the challenge is now consumed.
    Ok,
    /// An earlier attempt already consumed the challenge.
    Already,
    /// No such challenge (never issued, or swept).
    NotFound,
}

/// Concurrent [`ChallengeId`] → [`Challenge`] map with TTL semantics.
#[derive(Debug)]
pub struct ChallengeStore {
    entries: DashMap<ChallengeId, Challenge>,
    ttl: Duration,
    retention: Duration,
}

impl ChallengeStore {
    /// Create an empty store with the given TTL and retention window.
    pub fn new(ttl: Duration, retention: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            retention,
        }
    }

    /// Issue and store a fresh challenge.
    ///
    /// Allocates a random id, stamps `issued_at = now` and
    /// `expires_at = now + ttl`, and stores the record unconsumed.
    /// The only failure mode is allocator exhaustion, which panics the
    /// process like any other allocation failure.
    pub fn create(
        &self,
        bound_username: Username,
        commitment_r: BigUint,
        challenge_scalar: BigUint,
        now: DateTime<Utc>,
    ) -> Challenge {
        let challenge = Challenge {
            id: ChallengeId::new(),
            bound_username,
            commitment_r,
            challenge_scalar,
            issued_at: now,
            expires_at: now + self.ttl,
            consumed: false,
        };
        self.entries.insert(challenge.id, challenge.clone());
        challenge
    }

    /// Read a challenge without mutating it.
    pub fn get(&self, id: &ChallengeId) -> Option<Challenge> {
        self.entries.get(id).map(|c| c.clone())
    }

    /// Atomically flip `consumed` from false to true.
    ///
    /// The read-check-write runs under the entry's shard write lock:
    /// of N concurrent callers exactly one observes [`ConsumeOutcome::Ok`],
    /// the rest observe [`ConsumeOutcome::Already`].
    pub fn consume(&self, id: &ChallengeId) -> ConsumeOutcome {
        match self.entries.get_mut(id) {
            Some(mut entry) => {
                if entry.consumed {
                    ConsumeOutcome::Already
                } else {
                    entry.consumed = true;
                    ConsumeOutcome::Ok
                }
            }
            None => ConsumeOutcome::NotFound,
        }
    }

    /// Remove entries whose TTL and retention window have both elapsed.
    ///
    /// Returns the number of entries removed. Never removes an entry
    /// before its TTL has passed, so removal cannot race a legitimate
    /// consume.
    pub fn sweep(&self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|_, c| c.expires_at + self.retention >= now);
        before - self.entries.len()
    }

    /// Number of live entries (including consumed ones awaiting sweep).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Spawn the background expiry sweeper.
///
/// Runs [`ChallengeStore::sweep`] every `every` until the returned handle
/// is aborted. Low priority by construction: it only ever touches entries
/// already past TTL + retention.
pub fn spawn_sweeper(
    store: Arc<ChallengeStore>,
    every: std::time::Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        // The first tick fires immediately; harmless for a sweep.
        loop {
            ticker.tick().await;
            let removed = store.sweep(Utc::now());
            if removed > 0 {
                tracing::debug!(removed, "swept expired challenges");
            }
        }
    })
}
