//! # Cryptographic Error Types
//!
//! Structured errors for group parameter validation and element decoding.

use thiserror::Error;

/// Errors from cryptographic operations in `zkid-crypto`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Group parameters failed the safe-prime/subgroup checks.
    #[error("invalid group parameters: {0}")]
    InvalidGroup(String),

    /// A group element's hex encoding could not be decoded.
    #[error("invalid group element encoding: {0}")]
    HexDecode(String),
}
