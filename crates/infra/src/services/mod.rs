//! Use-case orchestration over the stores.
//!
//! Services own no persistent state; each call sequences store, hasher and
//! token-issuer calls and maps their failures into [`ServiceError`].

use thiserror::Error;

use shelf_auth::{PasswordError, TokenError};
use shelf_core::{DomainError, ValidationErrors};

use crate::store::StoreError;

pub mod accounts;
pub mod auth;
pub mod products;

pub use accounts::AccountService;
pub use auth::{AccessToken, AuthService, INVALID_CREDENTIALS};
pub use products::ProductService;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Deterministic, client-facing failure (validation, conflict, 401, 404).
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Token(#[from] TokenError),

    /// A blocking task panicked or was cancelled.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ValidationErrors> for ServiceError {
    fn from(value: ValidationErrors) -> Self {
        Self::Domain(DomainError::Validation(value))
    }
}

impl ServiceError {
    pub fn domain(&self) -> Option<&DomainError> {
        match self {
            ServiceError::Domain(e) => Some(e),
            _ => None,
        }
    }
}
