//! One-way password digests.

use thiserror::Error;

/// Work factor used when none is configured (2^10 rounds).
pub const DEFAULT_BCRYPT_COST: u32 = 10;

const MIN_COST: u32 = 4;
const MAX_COST: u32 = 31;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PasswordError {
    #[error("invalid bcrypt cost {0} (expected 4..=31)")]
    InvalidCost(u32),

    #[error("password hashing failed: {0}")]
    Hashing(String),
}

/// Slow, salted one-way hash used for stored credentials.
///
/// Implementations are CPU-bound and synchronous; async callers should run
/// them on a blocking thread.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, PasswordError>;

    /// Constant-time comparison of `password` against a stored digest.
    fn verify(&self, password: &str, digest: &str) -> Result<bool, PasswordError>;
}

/// bcrypt-backed hasher.
#[derive(Debug, Clone, Copy)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new(cost: u32) -> Result<Self, PasswordError> {
        if !(MIN_COST..=MAX_COST).contains(&cost) {
            return Err(PasswordError::InvalidCost(cost));
        }
        Ok(Self { cost })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self {
            cost: DEFAULT_BCRYPT_COST,
        }
    }
}

impl PasswordHasher for BcryptHasher {
    fn hash(&self, password: &str) -> Result<String, PasswordError> {
        bcrypt::hash(password, self.cost).map_err(|e| PasswordError::Hashing(e.to_string()))
    }

    fn verify(&self, password: &str, digest: &str) -> Result<bool, PasswordError> {
        bcrypt::verify(password, digest).map_err(|e| PasswordError::Hashing(e.to_string()))
    }
}
