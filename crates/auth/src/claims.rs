use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shelf_core::AccountId;

/// Claims carried by an access token.
///
/// Field names follow the registered JWT claim names so tokens interoperate
/// with standard tooling; timestamps are seconds since the Unix epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject: the authenticated account.
    pub sub: AccountId,

    /// Email the account registered with.
    pub email: String,

    /// Issued-at.
    pub iat: i64,

    /// Expiration.
    pub exp: i64,
}

impl AccessClaims {
    pub fn new(sub: AccountId, email: impl Into<String>, issued_at: DateTime<Utc>, ttl_secs: i64) -> Self {
        let iat = issued_at.timestamp();
        Self {
            sub,
            email: email.into(),
            iat,
            exp: iat.saturating_add(ttl_secs),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (iat is in the future)")]
    NotYetValid,

    #[error("invalid token time window (exp <= iat)")]
    InvalidTimeWindow,
}

/// Deterministically validate the time window of decoded claims.
///
/// Signature verification happens before this, in [`crate::token`].
pub fn validate_claims(claims: &AccessClaims, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    let now = now.timestamp();
    if claims.exp <= claims.iat {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now < claims.iat {
        return Err(TokenValidationError::NotYetValid);
    }
    if now >= claims.exp {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}
