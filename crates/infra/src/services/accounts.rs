use std::sync::Arc;

use tokio::sync::OnceCell;

use shelf_auth::{Account, PasswordHasher};
use shelf_core::DomainError;

use super::ServiceError;
use crate::store::{AccountStore, StoreError};

pub const EMAIL_TAKEN: &str = "Email already registered";

// Hashed once per service; unknown emails are verified against it so they
// cost the same bcrypt work as a wrong password.
const DUMMY_PASSWORD: &str = "dummy-password-never-issued";

/// Registers accounts and checks credentials against the credential store.
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn AccountStore>,
    hasher: Arc<dyn PasswordHasher>,
    dummy_digest: Arc<OnceCell<String>>,
}

impl AccountService {
    pub fn new(store: Arc<dyn AccountStore>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self {
            store,
            hasher,
            dummy_digest: Arc::new(OnceCell::new()),
        }
    }

    /// Create an account for `email`.
    ///
    /// The existence check is a fast path; the store's uniqueness constraint
    /// decides races between concurrent registrations.
    pub async fn register(&self, email: &str, password: &str) -> Result<Account, ServiceError> {
        if self.store.find_by_email(email).await?.is_some() {
            return Err(DomainError::conflict(EMAIL_TAKEN).into());
        }

        let digest = self.hash(password).await?;
        let account = match self.store.insert(email, &digest).await {
            Ok(a) => a,
            Err(StoreError::Duplicate(_)) => return Err(DomainError::conflict(EMAIL_TAKEN).into()),
            Err(e) => return Err(e.into()),
        };

        tracing::info!(account_id = %account.id, "account registered");
        Ok(account)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Account>, ServiceError> {
        Ok(self.store.find_by_email(email).await?)
    }

    /// The matching account, or `None` for an unknown email or a wrong password.
    pub async fn validate_credentials(&self, email: &str, password: &str) -> Result<Option<Account>, ServiceError> {
        let Some(account) = self.find_by_email(email).await? else {
            let digest = self
                .dummy_digest
                .get_or_try_init(|| self.hash(DUMMY_PASSWORD))
                .await?;
            self.verify(password, digest).await?;
            return Ok(None);
        };

        if self.verify(password, &account.password_hash).await? {
            Ok(Some(account))
        } else {
            Ok(None)
        }
    }

    async fn hash(&self, password: &str) -> Result<String, ServiceError> {
        let hasher = Arc::clone(&self.hasher);
        let password = password.to_owned();
        let digest = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))??;
        Ok(digest)
    }

    async fn verify(&self, password: &str, digest: &str) -> Result<bool, ServiceError> {
        let hasher = Arc::clone(&self.hasher);
        let password = password.to_owned();
        let digest = digest.to_owned();
        let ok = tokio::task::spawn_blocking(move || hasher.verify(&password, &digest))
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))??;
        Ok(ok)
    }
}
