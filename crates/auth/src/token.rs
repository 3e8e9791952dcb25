//! Bearer token issuance and verification (HS256 JWT).

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use shelf_core::AccountId;

use crate::claims::{AccessClaims, TokenValidationError, validate_claims};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("malformed token: {0}")]
    Malformed(String),

    #[error(transparent)]
    Claims(#[from] TokenValidationError),

    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// Produces signed bearer tokens for authenticated accounts.
pub trait TokenIssuer: Send + Sync {
    fn issue(&self, account_id: AccountId, email: &str, now: DateTime<Utc>) -> Result<String, TokenError>;
}

/// Checks a presented bearer token and returns its claims.
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<AccessClaims, TokenError>;
}

/// Symmetric-key JWT issuer/verifier.
///
/// Expiry is checked against the caller-supplied `now` rather than the system
/// clock so both directions stay deterministic under test.
pub struct Hs256Jwt {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: i64,
}

impl Hs256Jwt {
    pub fn new(secret: &[u8], ttl: std::time::Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl_secs: i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX),
        }
    }

    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }
}

impl TokenIssuer for Hs256Jwt {
    fn issue(&self, account_id: AccountId, email: &str, now: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = AccessClaims::new(account_id, email, now, self.ttl_secs);
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }
}

impl TokenVerifier for Hs256Jwt {
    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<AccessClaims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Time window is checked by `validate_claims` against `now`.
        validation.validate_exp = false;
        validation.leeway = 0;

        let data = jsonwebtoken::decode::<AccessClaims>(token, &self.decoding, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::Malformed(e.to_string()),
            }
        })?;

        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}
