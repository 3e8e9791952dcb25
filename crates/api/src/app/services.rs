//! Composition of stores, hasher and token issuer into the services handlers use.

use std::sync::Arc;

use sqlx::SqlitePool;

use shelf_auth::{BcryptHasher, PasswordError, TokenIssuer};
use shelf_infra::store::{SqliteAccountStore, SqliteProductStore};
use shelf_infra::{AccountService, AuthService, ProductService};

pub struct AppServices {
    pub auth: AuthService,
    pub products: ProductService,
}

pub fn build_services(
    pool: SqlitePool,
    tokens: Arc<dyn TokenIssuer>,
    bcrypt_cost: u32,
) -> Result<AppServices, PasswordError> {
    let hasher = Arc::new(BcryptHasher::new(bcrypt_cost)?);
    let accounts = AccountService::new(Arc::new(SqliteAccountStore::new(pool.clone())), hasher);

    Ok(AppServices {
        auth: AuthService::new(accounts, tokens),
        products: ProductService::new(Arc::new(SqliteProductStore::new(pool))),
    })
}
