//! # Session Token Issuance
//!
//! The core treats token issuance as an opaque, always-available
//! collaborator behind the [`TokenIssuer`] trait: verification succeeds,
//! the service asks for a token keyed on the principal, and whatever
//! signing or expiry policy the issuer applies is its own business.
//!
//! [`HmacTokenIssuer`] is the in-process implementation: compact
//! `base64url(claims).base64url(tag)` tokens signed with HMAC-SHA256.
//! Tag comparison on verification is constant-time.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;
use zkid_core::{AuthError, Username};

type HmacSha256 = Hmac<Sha256>;

/// A successfully issued session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    /// The opaque bearer token.
    pub token: String,
    /// Token scheme, always `"Bearer"`.
    pub token_type: String,
    /// Lifetime in seconds.
    pub expires_in: u64,
}

/// Boundary to the token issuance subsystem.
pub trait TokenIssuer: Send + Sync {
    /// Issue a session token for an authenticated principal.
    fn issue(&self, principal: &Username) -> Result<IssuedToken, AuthError>;
}

/// Signed claims carried inside an HMAC token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenClaims {
    /// The authenticated principal.
    pub sub: String,
    /// Issuance time, Unix seconds.
    pub iat: i64,
    /// Expiry time, Unix seconds.
    pub exp: i64,
}

/// Failures of token verification.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Not two dot-separated base64url parts, or undecodable claims.
    #[error("malformed token")]
    Malformed,
    /// The tag does not authenticate the claims.
    #[error("invalid token signature")]
    BadSignature,
    /// The `exp` claim is in the past.
    #[error("token expired")]
    Expired,
}

/// HMAC-SHA256 compact token issuer.
///
/// Token layout: `base64url(JSON claims) "." base64url(HMAC-SHA256 tag)`,
/// both segments unpadded. The tag authenticates the encoded claims
/// segment byte-for-byte.
pub struct HmacTokenIssuer {
    key: Vec<u8>,
    lifetime: Duration,
}

impl HmacTokenIssuer {
    /// Default token lifetime: 24 hours.
    pub const DEFAULT_LIFETIME_SECS: i64 = 86_400;

    /// Create an issuer with an explicit signing key.
    pub fn new(key: impl Into<Vec<u8>>, lifetime: Duration) -> Self {
        Self {
            key: key.into(),
            lifetime,
        }
    }

    /// Create an issuer with a random 32-byte key and the default
    /// lifetime. Tokens do not survive a restart; deployments that need
    /// that hand in a configured key instead.
    pub fn with_random_key() -> Self {
        let mut key = [0u8; 32];
        OsRng.fill_bytes(&mut key);
        Self::new(key.to_vec(), Duration::seconds(Self::DEFAULT_LIFETIME_SECS))
    }

    fn mac_for(&self, payload: &[u8]) -> Result<Vec<u8>, AuthError> {
        let mut mac = HmacSha256::new_from_slice(&self.key)
            .map_err(|e| AuthError::Internal(format!("hmac key setup: {e}")))?;
        mac.update(payload);
        Ok(mac.finalize().into_bytes().to_vec())
    }

    /// Verify a token and return its claims.
    ///
    /// Signature comparison is constant-time; expiry is checked only
    /// after the tag authenticates.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let (payload_b64, tag_b64) = token.split_once('.').ok_or(TokenError::Malformed)?;
        let tag = URL_SAFE_NO_PAD
            .decode(tag_b64)
            .map_err(|_| TokenError::Malformed)?;
        let expected = self
            .mac_for(payload_b64.as_bytes())
            .map_err(|_| TokenError::Malformed)?;
        if expected.ct_eq(&tag).unwrap_u8() != 1 {
            return Err(TokenError::BadSignature);
        }

        let payload = URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|_| TokenError::Malformed)?;
        let claims: TokenClaims =
            serde_json::from_slice(&payload).map_err(|_| TokenError::Malformed)?;
        if claims.exp <= Utc::now().timestamp() {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }
}

impl TokenIssuer for HmacTokenIssuer {
    fn issue(&self, principal: &Username) -> Result<IssuedToken, AuthError> {
        let now = Utc::now();
        let claims = TokenClaims {
            sub: principal.as_str().to_string(),
            iat: now.timestamp(),
            exp: (now + self.lifetime).timestamp(),
        };
        let payload = serde_json::to_vec(&claims)
            .map_err(|e| AuthError::Internal(format!("claims encoding: {e}")))?;
        let payload_b64 = URL_SAFE_NO_PAD.encode(&payload);
        let tag = self.mac_for(payload_b64.as_bytes())?;
        let tag_b64 = URL_SAFE_NO_PAD.encode(&tag);

        Ok(IssuedToken {
            token: format!("{payload_b64}.{tag_b64}"),
            token_type: "Bearer".to_string(),
            expires_in: self.lifetime.num_seconds().max(0) as u64,
        })
    }
}
