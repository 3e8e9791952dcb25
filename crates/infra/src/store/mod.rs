//! Persistence seams for accounts and products.
//!
//! Services only see these traits; `in_memory` backs tests/dev and `sqlite`
//! backs the running server.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use shelf_auth::Account;
use shelf_core::ProductId;
use shelf_products::{NewProduct, Product};

pub mod in_memory;
pub mod sqlite;

pub use in_memory::{InMemoryAccountStore, InMemoryProductStore};
pub use sqlite::{SqliteAccountStore, SqliteProductStore};

/// Storage-layer failure. Opaque to clients.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write.
    #[error("duplicate record: {0}")]
    Duplicate(String),

    /// A stored row could not be mapped back into a record.
    #[error("corrupt row: {0}")]
    Corrupt(String),

    #[error("database error in {operation}: {source}")]
    Database {
        operation: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Credential store: one account per email.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;

    /// Persist a new account and return it with its generated id and timestamps.
    ///
    /// Must fail with [`StoreError::Duplicate`] if the email is taken, even when
    /// a concurrent caller won the race after the service's existence check.
    async fn insert(&self, email: &str, password_hash: &str) -> Result<Account, StoreError>;
}

/// Product store.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// All products, oldest first.
    async fn list(&self) -> Result<Vec<Product>, StoreError>;

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, StoreError>;

    /// Persist a new product; the store assigns id and timestamps.
    async fn insert(&self, product: NewProduct) -> Result<Product, StoreError>;

    /// Overwrite an existing product with `product`'s fields. Returns whether
    /// a stored row was there to overwrite.
    async fn save(&self, product: &Product) -> Result<bool, StoreError>;

    /// Remove a product. Returns whether a row was deleted.
    async fn delete(&self, id: &ProductId) -> Result<bool, StoreError>;
}

#[async_trait]
impl<S> AccountStore for Arc<S>
where
    S: AccountStore + ?Sized,
{
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        (**self).find_by_email(email).await
    }

    async fn insert(&self, email: &str, password_hash: &str) -> Result<Account, StoreError> {
        (**self).insert(email, password_hash).await
    }
}

#[async_trait]
impl<S> ProductStore for Arc<S>
where
    S: ProductStore + ?Sized,
{
    async fn list(&self) -> Result<Vec<Product>, StoreError> {
        (**self).list().await
    }

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, StoreError> {
        (**self).find_by_id(id).await
    }

    async fn insert(&self, product: NewProduct) -> Result<Product, StoreError> {
        (**self).insert(product).await
    }

    async fn save(&self, product: &Product) -> Result<bool, StoreError> {
        (**self).save(product).await
    }

    async fn delete(&self, id: &ProductId) -> Result<bool, StoreError> {
        (**self).delete(id).await
    }
}
