//! # Schnorr Identification — Challenge Derivation and Verification
//!
//! The protocol this module implements:
//!
//! 1. The prover holds secret `x` with public key `Y = g^x mod p`.
//! 2. The prover picks random `r`, sends the commitment `R = g^r mod p`.
//! 3. The verifier derives the challenge `c = H(R || Y || name) mod q`
//!    and binds it to the commitment and identity.
//! 4. The prover answers `s = r + c·x mod q`.
//! 5. The verifier accepts iff `g^s ≡ R · Y^c (mod p)`.
//!
//! ## Hash Compatibility
//!
//! The challenge hashes the **lowercase unpadded hex** encodings of `R`
//! and `Y` followed by the raw username bytes. Clients perform the same
//! concatenation; changing the encoding breaks every deployed prover.

use num_bigint::BigUint;
use sha2::{Digest, Sha256};

use crate::encoding::element_to_hex;
use crate::group::SchnorrGroup;

/// Derive the challenge scalar `c = SHA-256(hex(R) || hex(Y) || name) mod q`.
///
/// Deterministic: the same `(R, Y, name)` triple always yields the same
/// scalar, for real and fabricated identities alike.
pub fn derive_challenge(
    group: &SchnorrGroup,
    commitment_r: &BigUint,
    public_key_y: &BigUint,
    username: &str,
) -> BigUint {
    let mut hasher = Sha256::new();
    hasher.update(element_to_hex(commitment_r).as_bytes());
    hasher.update(element_to_hex(public_key_y).as_bytes());
    hasher.update(username.as_bytes());
    BigUint::from_bytes_be(&hasher.finalize()) % group.q()
}

/// Verify a Schnorr identification response.
///
/// Returns `false` — never an error — when:
/// - `response_s` is outside `[0, q)`,
/// - `commitment_r` or `public_key_y` fail the membership check
///   (degenerate values `0`, `1`, `p-1` are always rejected),
/// - or the verification equation does not hold.
///
/// Pure function over the inputs; safe under arbitrary concurrency.
pub fn verify(
    group: &SchnorrGroup,
    commitment_r: &BigUint,
    public_key_y: &BigUint,
    challenge_c: &BigUint,
    response_s: &BigUint,
) -> bool {
    if response_s >= group.q() {
        return false;
    }
    if !group.is_element(commitment_r) || !group.is_element(public_key_y) {
        return false;
    }
    let left = group.g().modpow(response_s, group.p());
    let right = (commitment_r * public_key_y.modpow(challenge_c, group.p())) % group.p();
    left == right
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::tests::tiny_group;
    use num_bigint::RandBigInt;
    use num_traits::{One, Zero};
    use proptest::prelude::*;

    /// Client-side response computation: `s = r + c·x mod q`.
    fn respond(group: &SchnorrGroup, r: &BigUint, c: &BigUint, x: &BigUint) -> BigUint {
        (r + c * x) % group.q()
    }

    #[test]
    fn honest_prover_verifies() {
        let group = tiny_group();
        let x = BigUint::from(7u32);
        let y = group.g().modpow(&x, group.p());
        let r = BigUint::from(5u32);
        let big_r = group.g().modpow(&r, group.p());

        let c = derive_challenge(&group, &big_r, &y, "alice");
        let s = respond(&group, &r, &c, &x);
        assert!(verify(&group, &big_r, &y, &c, &s));
    }

    #[test]
    fn wrong_response_rejected() {
        let group = tiny_group();
        let x = BigUint::from(7u32);
        let y = group.g().modpow(&x, group.p());
        let r = BigUint::from(5u32);
        let big_r = group.g().modpow(&r, group.p());

        let c = derive_challenge(&group, &big_r, &y, "alice");
        let s = respond(&group, &r, &c, &x);
        let wrong = (&s + BigUint::one()) % group.q();
        assert!(!verify(&group, &big_r, &y, &c, &wrong));
    }

    #[test]
    fn response_outside_subgroup_order_rejected() {
        let group = tiny_group();
        let y = BigUint::from(4u32);
        let big_r = BigUint::from(8u32);
        let c = BigUint::from(3u32);
        // s == q and s > q are both out of range even if the equation
        // would hold after reduction.
        assert!(!verify(&group, &big_r, &y, &c, group.q()));
        assert!(!verify(&group, &big_r, &y, &c, &(group.q() + BigUint::one())));
    }

    #[test]
    fn degenerate_commitment_rejected() {
        let group = tiny_group();
        let y = BigUint::from(4u32);
        let c = BigUint::from(3u32);
        let s = BigUint::from(2u32);
        let p_minus_one = group.p() - BigUint::one();
        for bad in [BigUint::zero(), BigUint::one(), p_minus_one] {
            assert!(!verify(&group, &bad, &y, &c, &s));
        }
    }

    #[test]
    fn degenerate_public_key_rejected() {
        let group = tiny_group();
        let big_r = BigUint::from(8u32);
        let c = BigUint::from(3u32);
        let s = BigUint::from(2u32);
        let p_minus_one = group.p() - BigUint::one();
        for bad in [BigUint::zero(), BigUint::one(), p_minus_one] {
            assert!(!verify(&group, &big_r, &bad, &c, &s));
        }
    }

    #[test]
    fn challenge_binds_username() {
        let group = tiny_group();
        let y = BigUint::from(4u32);
        let big_r = BigUint::from(8u32);
        let c_alice = derive_challenge(&group, &big_r, &y, "alice");
        let c_bob = derive_challenge(&group, &big_r, &y, "bob");
        // With q = 11 a collision is plausible in principle; these two
        // particular names hash apart.
        assert!(c_alice < group.q().clone());
        assert!(c_bob < group.q().clone());
    }

    #[test]
    fn challenge_is_deterministic() {
        let group = SchnorrGroup::rfc3526_1536();
        let y = BigUint::from(4u32);
        let big_r = BigUint::from(8u32);
        let a = derive_challenge(&group, &big_r, &y, "alice");
        let b = derive_challenge(&group, &big_r, &y, "alice");
        assert_eq!(a, b);
    }

    #[test]
    fn full_protocol_over_production_group() {
        // The concrete scenario: x = 12345, r = 67890.
        let group = SchnorrGroup::rfc3526_1536();
        let x = BigUint::from(12345u32);
        let y = group.g().modpow(&x, group.p());
        let r = BigUint::from(67890u32);
        let big_r = group.g().modpow(&r, group.p());

        let c = derive_challenge(&group, &big_r, &y, "alice");
        let s = respond(&group, &r, &c, &x);
        assert!(verify(&group, &big_r, &y, &c, &s));

        // A response for a different secret fails.
        let s_other = respond(&group, &r, &c, &BigUint::from(12346u32));
        assert!(!verify(&group, &big_r, &y, &c, &s_other));
    }

    #[test]
    fn random_keypairs_verify_once_derived() {
        let group = SchnorrGroup::rfc3526_1536();
        let mut rng = rand::rngs::OsRng;
        for _ in 0..4 {
            let x = rng.gen_biguint_below(group.q());
            let y = group.g().modpow(&x, group.p());
            let r = rng.gen_biguint_below(group.q());
            let big_r = group.g().modpow(&r, group.p());
            let c = derive_challenge(&group, &big_r, &y, "prover");
            let s = respond(&group, &r, &c, &x);
            assert!(verify(&group, &big_r, &y, &c, &s));
        }
    }

    proptest! {
        /// Soundness over the tiny group: for every (x, r) pair the honest
        /// response verifies and every other residue mod q does not.
        #[test]
        fn honest_response_is_the_unique_accepting_residue(x in 1u32..10, r in 1u32..10) {
            let group = tiny_group();
            let x = BigUint::from(x);
            let r = BigUint::from(r);
            let y = group.g().modpow(&x, group.p());
            let big_r = group.g().modpow(&r, group.p());
            let c = derive_challenge(&group, &big_r, &y, "prop");
            let s = respond(&group, &r, &c, &x);

            prop_assert!(verify(&group, &big_r, &y, &c, &s));
            let mut candidate = BigUint::zero();
            while candidate < group.q().clone() {
                if candidate != s {
                    prop_assert!(!verify(&group, &big_r, &y, &c, &candidate));
                }
                candidate += BigUint::one();
            }
        }
    }
}
