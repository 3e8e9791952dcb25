use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use shelf_auth::Account;
use shelf_core::{AccountId, ProductId};
use shelf_products::{NewProduct, Product};

use super::{AccountStore, ProductStore, StoreError};

fn poisoned() -> StoreError {
    StoreError::Unavailable("lock poisoned".to_string())
}

/// In-memory credential store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    by_email: RwLock<HashMap<String, Account>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let map = self.by_email.read().map_err(|_| poisoned())?;
        Ok(map.get(email).cloned())
    }

    async fn insert(&self, email: &str, password_hash: &str) -> Result<Account, StoreError> {
        let mut map = self.by_email.write().map_err(|_| poisoned())?;
        if map.contains_key(email) {
            return Err(StoreError::Duplicate(format!("accounts.email = {email}")));
        }

        let now = Utc::now();
        let account = Account {
            id: AccountId::new(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: now,
            updated_at: now,
        };
        map.insert(email.to_string(), account.clone());
        Ok(account)
    }
}

/// In-memory product store for tests/dev. Keeps insertion order.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    rows: RwLock<Vec<Product>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn list(&self) -> Result<Vec<Product>, StoreError> {
        Ok(self.rows.read().map_err(|_| poisoned())?.clone())
    }

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, StoreError> {
        let rows = self.rows.read().map_err(|_| poisoned())?;
        Ok(rows.iter().find(|p| p.id == *id).cloned())
    }

    async fn insert(&self, product: NewProduct) -> Result<Product, StoreError> {
        let product = product.into_product(ProductId::new(), Utc::now());
        self.rows.write().map_err(|_| poisoned())?.push(product.clone());
        Ok(product)
    }

    async fn save(&self, product: &Product) -> Result<bool, StoreError> {
        let mut rows = self.rows.write().map_err(|_| poisoned())?;
        match rows.iter_mut().find(|p| p.id == product.id) {
            Some(slot) => {
                *slot = product.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &ProductId) -> Result<bool, StoreError> {
        let mut rows = self.rows.write().map_err(|_| poisoned())?;
        let before = rows.len();
        rows.retain(|p| p.id != *id);
        Ok(rows.len() != before)
    }
}
