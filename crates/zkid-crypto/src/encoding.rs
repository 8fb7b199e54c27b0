//! # Group Element Wire Encoding
//!
//! Group elements travel as lowercase, unpadded, big-endian hexadecimal
//! strings. The same encoding feeds the challenge hash, so both sides of
//! the protocol must agree on it byte-for-byte: no `0x` prefix, no
//! leading zeros, lowercase digits.

use num_bigint::BigUint;
use num_traits::Num;

use crate::error::CryptoError;

/// Decode a group element from its hex encoding.
///
/// Accepts upper- or lowercase digits. Rejects empty strings, prefixes,
/// and any non-hexadecimal character.
pub fn parse_element_hex(raw: &str) -> Result<BigUint, CryptoError> {
    if raw.is_empty() {
        return Err(CryptoError::HexDecode("empty string".to_string()));
    }
    if !raw.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(CryptoError::HexDecode(
            "non-hexadecimal character".to_string(),
        ));
    }
    BigUint::from_str_radix(raw, 16)
        .map_err(|e| CryptoError::HexDecode(e.to_string()))
}

/// Encode a group element as lowercase unpadded hex.
///
/// This is the canonical form hashed by the challenge derivation.
pub fn element_to_hex(value: &BigUint) -> String {
    value.to_str_radix(16)
}
