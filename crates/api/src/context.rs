use shelf_auth::AccessClaims;
use shelf_core::AccountId;

/// Authenticated caller of a protected route, taken from verified token claims.
///
/// Inserted into request extensions by the auth middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    account_id: AccountId,
    email: String,
}

impl PrincipalContext {
    pub fn new(account_id: AccountId, email: impl Into<String>) -> Self {
        Self {
            account_id,
            email: email.into(),
        }
    }

    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

impl From<AccessClaims> for PrincipalContext {
    fn from(claims: AccessClaims) -> Self {
        Self::new(claims.sub, claims.email)
    }
}
