use std::sync::Arc;

use chrono::Utc;

use shelf_auth::{Account, TokenIssuer};
use shelf_core::DomainError;

use super::{AccountService, ServiceError};

/// The one message every failed login gets, whatever the cause.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub access_token: String,
}

/// Register/login flows: account service plus token issuance.
#[derive(Clone)]
pub struct AuthService {
    accounts: AccountService,
    tokens: Arc<dyn TokenIssuer>,
}

impl AuthService {
    pub fn new(accounts: AccountService, tokens: Arc<dyn TokenIssuer>) -> Self {
        Self { accounts, tokens }
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<AccessToken, ServiceError> {
        let account = self.accounts.register(email, password).await?;
        self.issue(&account)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AccessToken, ServiceError> {
        match self.accounts.validate_credentials(email, password).await? {
            Some(account) => {
                tracing::info!(account_id = %account.id, "login succeeded");
                self.issue(&account)
            }
            None => {
                tracing::warn!("login rejected");
                Err(DomainError::unauthorized(INVALID_CREDENTIALS).into())
            }
        }
    }

    fn issue(&self, account: &Account) -> Result<AccessToken, ServiceError> {
        let access_token = self.tokens.issue(account.id, &account.email, Utc::now())?;
        Ok(AccessToken { access_token })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_auth::{BcryptHasher, Hs256Jwt, TokenVerifier};

    use crate::store::InMemoryAccountStore;

    fn setup() -> (AuthService, Arc<Hs256Jwt>, AccountService) {
        let accounts = AccountService::new(
            Arc::new(InMemoryAccountStore::new()),
            Arc::new(BcryptHasher::new(4).unwrap()),
        );
        let jwt = Arc::new(Hs256Jwt::new(b"test-secret", std::time::Duration::from_secs(3600)));
        (AuthService::new(accounts.clone(), jwt.clone()), jwt, accounts)
    }

    #[tokio::test]
    async fn register_then_login_yields_tokens_for_the_same_subject() {
        let (auth, jwt, accounts) = setup();

        let registered = auth.register("ada@example.com", "secret1").await.unwrap();
        let logged_in = auth.login("ada@example.com", "secret1").await.unwrap();

        let account = accounts.find_by_email("ada@example.com").await.unwrap().unwrap();
        for token in [registered, logged_in] {
            let claims = jwt.verify(&token.access_token, Utc::now()).unwrap();
            assert_eq!(claims.sub, account.id);
            assert_eq!(claims.email, "ada@example.com");
        }
    }

    #[tokio::test]
    async fn register_propagates_conflict() {
        let (auth, _, _) = setup();
        auth.register("ada@example.com", "secret1").await.unwrap();

        let err = auth.register("ada@example.com", "secret2").await.unwrap_err();
        assert!(matches!(err.domain(), Some(DomainError::Conflict(_))));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_fail_identically() {
        let (auth, _, _) = setup();
        auth.register("ada@example.com", "secret1").await.unwrap();

        let wrong_pw = auth.login("ada@example.com", "nope-nope").await.unwrap_err();
        let unknown = auth.login("bob@example.com", "secret1").await.unwrap_err();

        let expected = DomainError::unauthorized(INVALID_CREDENTIALS);
        assert_eq!(wrong_pw.domain(), Some(&expected));
        assert_eq!(unknown.domain(), Some(&expected));
        assert_eq!(wrong_pw.to_string(), unknown.to_string());
    }
}
