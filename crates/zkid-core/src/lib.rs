//! # zkid-core — Foundational Types for the ZKID Stack
//!
//! Defines the type-system primitives shared by every other crate in the
//! workspace: validated identifier newtypes and the authentication error
//! taxonomy. Every other crate depends on `zkid-core`; it depends on
//! nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** [`Username`] and
//!    [`ChallengeId`] are distinct types with validated constructors.
//!    No bare strings for identifiers.
//!
//! 2. **Validation at construction.** A `Username` that exists is a
//!    `Username` that passed the length and blankness rules. Handlers and
//!    services never re-check.
//!
//! 3. **One error taxonomy.** [`AuthError`] is the single failure
//!    vocabulary of the authentication core; transport layers map it,
//!    they never extend it.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `zkid-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod identity;

pub use error::AuthError;
pub use identity::{ChallengeId, Username, MAX_USERNAME_LEN};
