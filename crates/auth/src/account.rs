use chrono::{DateTime, Utc};

use shelf_core::AccountId;

/// A registered account.
///
/// # Invariants
/// - `email` is unique across all accounts and compared case-sensitively.
/// - `password_hash` is a one-way digest; the plaintext is never stored.
/// - Accounts are immutable after registration.
#[derive(Clone, PartialEq, Eq)]
pub struct Account {
    pub id: AccountId,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Keep the digest out of logs.
impl core::fmt::Debug for Account {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}
