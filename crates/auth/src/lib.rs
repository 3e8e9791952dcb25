//! `shelf-auth`: accounts, credentials, password hashing and bearer tokens.
//!
//! This crate is intentionally decoupled from HTTP and storage: it defines the
//! account record and the pure building blocks the auth services compose.

pub mod account;
pub mod claims;
pub mod credentials;
pub mod password;
pub mod token;

pub use account::Account;
pub use claims::{AccessClaims, TokenValidationError, validate_claims};
pub use credentials::{Credentials, LoginInput, RegisterInput, is_valid_email, MIN_PASSWORD_LEN};
pub use password::{BcryptHasher, PasswordError, PasswordHasher, DEFAULT_BCRYPT_COST};
pub use token::{Hs256Jwt, TokenError, TokenIssuer, TokenVerifier};
