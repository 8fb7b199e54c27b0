//! # zkid-crypto — Schnorr Identification Primitives
//!
//! Provides the cryptographic building blocks for the ZKID stack:
//!
//! - **[`SchnorrGroup`]** — safe-prime group parameters (RFC 3526
//!   1536-bit MODP group in production), validated once at startup.
//! - **Hex codec** — the wire encoding for group elements (lowercase,
//!   unpadded, big-endian hex).
//! - **Challenge derivation** — `c = SHA-256(hex(R) || hex(Y) || name) mod q`.
//! - **[`schnorr::verify`]** — the pure verification equation
//!   `g^s ≡ R · Y^c (mod p)`.
//!
//! ## Crate Policy
//!
//! - No internal dependencies (usable standalone).
//! - Verification is a pure function: no shared state, no I/O, safe to
//!   call concurrently from any number of callers.
//! - No mocking of cryptographic operations in tests — all tests use
//!   real modular arithmetic over real (if sometimes small) groups.

pub mod encoding;
pub mod error;
pub mod group;
pub mod schnorr;

pub use encoding::{element_to_hex, parse_element_hex};
pub use error::CryptoError;
pub use group::SchnorrGroup;
pub use schnorr::{derive_challenge, verify};
