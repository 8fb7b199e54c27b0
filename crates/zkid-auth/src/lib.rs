//! # zkid-auth — Password-less Authentication Core
//!
//! The stateful heart of the ZKID stack: registration of Schnorr public
//! keys, single-round challenge issuance with replay protection and TTL
//! expiry, proof verification, and session token issuance.
//!
//! ## Components
//!
//! - [`UserRegistry`] — username → registered public key, atomic
//!   insert-if-absent registration.
//! - [`ChallengeStore`] — challenge id → single-use challenge state with
//!   exactly-once consumption and a background expiry sweeper.
//! - [`TokenIssuer`] / [`HmacTokenIssuer`] — session token boundary.
//! - [`EventSink`] / [`TracingEventSink`] — authentication event boundary.
//! - [`AuthService`] — the orchestrating state machine; owns the
//!   anti-enumeration and replay policy.
//!
//! ## Concurrency Model
//!
//! Both stores are sharded concurrent maps; every mutating operation is a
//! single atomic step under the owning entry's shard lock. No global
//! lock, no lock held across `.await` — all service operations are
//! synchronous and run to completion.

pub mod challenge;
pub mod config;
pub mod events;
pub mod registry;
pub mod service;
pub mod token;

pub use challenge::{Challenge, ChallengeStore, ConsumeOutcome};
pub use config::{AuthConfig, FailurePolicy};
pub use events::{AuthEvent, EventSink, TracingEventSink};
pub use registry::{UserRecord, UserRegistry};
pub use service::{AuthService, ChallengeGrant};
pub use token::{HmacTokenIssuer, IssuedToken, TokenIssuer};
