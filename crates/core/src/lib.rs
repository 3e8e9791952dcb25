//! `shelf-core`: shared domain primitives (no IO, no HTTP, no storage).

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult, FieldError, ValidationErrors};
pub use id::{AccountId, ProductId};
