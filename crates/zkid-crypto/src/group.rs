//! # Schnorr Group Parameters
//!
//! The safe-prime group the identification protocol runs over: a prime
//! `p` with `p = 2q + 1` for prime `q`, and a generator `g` of the
//! order-`q` subgroup. Production deployments use the RFC 3526 1536-bit
//! MODP group with `g = 2`.
//!
//! ## Security Invariant
//!
//! Parameters are validated once, at startup, and never mutated. A group
//! that fails [`SchnorrGroup::validate`] must abort the process — running
//! the protocol over a composite modulus or a generator outside the prime
//! subgroup silently voids every soundness guarantee downstream.
//!
//! [`SchnorrGroup::is_element`] is the membership check used at every
//! trust boundary: `1 < v < p - 1`. The degenerate values `0`, `1`, and
//! `p - 1` are never accepted, which blocks small-subgroup and
//! identity-element submissions.

use num_bigint::{BigUint, RandBigInt};
use num_traits::{Num, One, Zero};
use rand::rngs::OsRng;

use crate::error::CryptoError;

/// RFC 3526 §2 — 1536-bit MODP group prime, `p = 2q + 1` with `q` prime.
const RFC3526_1536_P_HEX: &str = concat!(
    "FFFFFFFFFFFFFFFFC90FDAA22168C234C4C6628B80DC1CD1",
    "29024E088A67CC74020BBEA63B139B22514A08798E3404DD",
    "EF9519B3CD3A431B302B0A6DF25F14374FE1356D6D51C245",
    "E485B576625E7EC6F44C42E9A637ED6B0BFF5CB6F406B7ED",
    "EE386BFB5A899FA5AE9F24117C4B1FE649286651ECE45B3D",
    "C2007CB8A163BF0598DA48361C55D39A69163FA8FD24CF5F",
    "83655D23DCA3AD961C62F356208552BB9ED529077096966D",
    "670C354E4ABC9804F1746C08CA237327FFFFFFFFFFFFFFFF",
);

/// Miller-Rabin rounds for startup validation. With random witnesses the
/// error bound is 4^-64 per number, far below any operational concern.
const MILLER_RABIN_ROUNDS: usize = 64;

/// Immutable Schnorr group parameters `(p, q, g)`.
///
/// Constructed once and shared via `Arc` across all threads; there is no
/// interior mutability, so no synchronization is required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchnorrGroup {
    p: BigUint,
    q: BigUint,
    g: BigUint,
}

impl SchnorrGroup {
    /// Construct a group from explicit parameters.
    ///
    /// The parameters are **not** checked here; call
    /// [`SchnorrGroup::validate`] before use.
    pub fn new(p: BigUint, q: BigUint, g: BigUint) -> Self {
        Self { p, q, g }
    }

    /// The production group: RFC 3526 1536-bit MODP, `g = 2`.
    pub fn rfc3526_1536() -> Self {
        // The constant is a compile-time-known valid hex literal.
        let p = BigUint::from_str_radix(RFC3526_1536_P_HEX, 16)
            .unwrap_or_else(|_| unreachable!("RFC 3526 constant is valid hex"));
        let q = (&p - BigUint::one()) >> 1;
        Self::new(p, q, BigUint::from(2u32))
    }

    /// The safe prime modulus `p`.
    pub fn p(&self) -> &BigUint {
        &self.p
    }

    /// The prime subgroup order `q = (p - 1) / 2`.
    pub fn q(&self) -> &BigUint {
        &self.q
    }

    /// The subgroup generator `g`.
    pub fn g(&self) -> &BigUint {
        &self.g
    }

    /// Validate the safe-prime and subgroup structure.
    ///
    /// Checks, in order:
    /// - `p` and `q` are (probable) primes,
    /// - `p = 2q + 1`,
    /// - `1 < g < p - 1` and `g^q ≡ 1 (mod p)`.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidGroup`] naming the first failed
    /// check. Callers at startup must treat this as fatal.
    pub fn validate(&self) -> Result<(), CryptoError> {
        let one = BigUint::one();
        if !is_probable_prime(&self.p, MILLER_RABIN_ROUNDS) {
            return Err(CryptoError::InvalidGroup("p is not prime".to_string()));
        }
        if !is_probable_prime(&self.q, MILLER_RABIN_ROUNDS) {
            return Err(CryptoError::InvalidGroup("q is not prime".to_string()));
        }
        if self.p != (&self.q << 1) + &one {
            return Err(CryptoError::InvalidGroup(
                "p != 2q + 1".to_string(),
            ));
        }
        if !self.is_element(&self.g) {
            return Err(CryptoError::InvalidGroup(
                "g is outside (1, p-1)".to_string(),
            ));
        }
        if self.g.modpow(&self.q, &self.p) != one {
            return Err(CryptoError::InvalidGroup(
                "g^q != 1 mod p".to_string(),
            ));
        }
        Ok(())
    }

    /// Membership / non-degeneracy check: `1 < v < p - 1`.
    pub fn is_element(&self, v: &BigUint) -> bool {
        let one = BigUint::one();
        *v > one && *v < &self.p - &one
    }
}

/// Miller-Rabin probabilistic primality test with random witnesses.
fn is_probable_prime(n: &BigUint, rounds: usize) -> bool {
    let one = BigUint::one();
    let two = BigUint::from(2u32);
    if *n < two {
        return false;
    }
    // Trial division by small primes settles small inputs and cheaply
    // rejects most composites before any modpow.
    for small in [2u32, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37] {
        let sp = BigUint::from(small);
        if *n == sp {
            return true;
        }
        if (n % &sp).is_zero() {
            return false;
        }
    }

    // Write n - 1 = d * 2^s with d odd.
    let n_minus_one = n - &one;
    let s = n_minus_one.trailing_zeros().unwrap_or(0);
    let d = &n_minus_one >> s;

    let mut rng = OsRng;
    'witness: for _ in 0..rounds {
        let a = rng.gen_biguint_range(&two, &n_minus_one);
        let mut x = a.modpow(&d, n);
        if x == one || x == n_minus_one {
            continue;
        }
        for _ in 1..s {
            x = (&x * &x) % n;
            if x == n_minus_one {
                continue 'witness;
            }
        }
        return false;
    }
    true
}
