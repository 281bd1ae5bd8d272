//! Stateless signed bearer tokens.
//!
//! Tokens follow the JWT compact serialisation (`header.payload.signature`,
//! each segment base64url encoded) and are signed with HMAC-SHA256 under a
//! single secret fixed at process start. The algorithm is pinned: a token
//! declaring any other algorithm is rejected even if its signature would
//! verify. Expiry is checked against the injected [`Clock`] so tests can move
//! time explicitly.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use zeroize::Zeroizing;

/// The only algorithm this service issues or accepts.
pub const PINNED_ALGORITHM: Algorithm = Algorithm::HS256;

/// Identity asserted by a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Expiry as seconds since the Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl Claims {
    /// Claims naming only an email address, without expiry.
    pub fn for_email(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            first_name: None,
            last_name: None,
            exp: None,
        }
    }
}

/// Reasons a token could not be issued or verified.
///
/// Callers outside the token service must not surface the variant to
/// clients; every verification failure means "forbidden".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,
    #[error("token algorithm does not match the pinned algorithm")]
    AlgorithmMismatch,
    #[error("token signature does not match")]
    SignatureMismatch,
    #[error("token has expired")]
    Expired,
    #[error("failed to sign token: {message}")]
    Signing { message: String },
}

/// Errors raised when constructing a [`TokenSecret`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenSecretError {
    #[error("token secret must not be empty")]
    Empty,
}

/// Symmetric signing secret; the bytes are wiped on drop.
pub struct TokenSecret(Zeroizing<Vec<u8>>);

impl TokenSecret {
    /// Wrap secret bytes, rejecting an empty secret.
    pub fn new(bytes: Vec<u8>) -> Result<Self, TokenSecretError> {
        let bytes = Zeroizing::new(bytes);
        if bytes.is_empty() {
            return Err(TokenSecretError::Empty);
        }
        Ok(Self(bytes))
    }

    /// Number of secret bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false: empty secrets cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn expose(&self) -> &[u8] {
        self.0.as_slice()
    }
}

impl fmt::Debug for TokenSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TokenSecret").field(&"<redacted>").finish()
    }
}

/// Issues and verifies bearer tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock>,
    ttl: Option<Duration>,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("algorithm", &PINNED_ALGORITHM)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    /// Build a service signing with `secret` and reading time from `clock`.
    pub fn new(secret: &TokenSecret, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(PINNED_ALGORITHM);
        // `exp` is optional and checked against the injected clock instead.
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(secret.expose()),
            decoding: DecodingKey::from_secret(secret.expose()),
            validation,
            clock,
            ttl: None,
        }
    }

    /// Lifetime stamped onto tokens minted by [`TokenService::mint`].
    #[must_use]
    pub fn with_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.ttl = ttl;
        self
    }

    /// Sign `claims` exactly as given.
    pub fn issue(&self, claims: &Claims) -> Result<String, TokenError> {
        jsonwebtoken::encode(&Header::new(PINNED_ALGORITHM), claims, &self.encoding).map_err(
            |err| TokenError::Signing {
                message: err.to_string(),
            },
        )
    }

    /// Stamp the configured expiry onto `claims` and sign them.
    pub fn mint(&self, mut claims: Claims) -> Result<String, TokenError> {
        claims.exp = self.expiry();
        self.issue(&claims)
    }

    /// Verify `token` and return its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|err| match err.kind() {
                ErrorKind::InvalidAlgorithm => TokenError::AlgorithmMismatch,
                ErrorKind::InvalidSignature => TokenError::SignatureMismatch,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            })?;
        let claims = data.claims;
        match claims.exp {
            Some(exp) if self.clock.utc().timestamp() >= exp => Err(TokenError::Expired),
            _ => Ok(claims),
        }
    }

    fn expiry(&self) -> Option<i64> {
        let ttl = self.ttl?;
        let secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        Some(self.clock.utc().timestamp().saturating_add(secs))
    }
}
