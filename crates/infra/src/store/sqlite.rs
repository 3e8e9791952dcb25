//! SQLite-backed stores.
//!
//! Ids are stored as their canonical text form, timestamps as RFC 3339 text and
//! prices as integer cents. Email uniqueness is enforced by the schema, which
//! is the authoritative guard against concurrent registrations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::instrument;

use shelf_auth::Account;
use shelf_core::{AccountId, ProductId};
use shelf_products::{NewProduct, Price, Product};

use super::{AccountStore, ProductStore, StoreError};

fn map_sqlx_error(operation: &'static str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            StoreError::Duplicate(format!("{operation}: {}", db_err.message()))
        }
        other => StoreError::Database {
            operation,
            source: other,
        },
    }
}

fn corrupt(column: &str, err: impl core::fmt::Display) -> StoreError {
    StoreError::Corrupt(format!("{column}: {err}"))
}

#[derive(Debug, Clone)]
pub struct SqliteAccountStore {
    pool: SqlitePool,
}

impl SqliteAccountStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

struct AccountRow {
    id: String,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl<'r> sqlx::FromRow<'r, SqliteRow> for AccountRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(AccountRow {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl TryFrom<AccountRow> for Account {
    type Error = StoreError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        Ok(Account {
            id: row.id.parse::<AccountId>().map_err(|e| corrupt("accounts.id", e))?,
            email: row.email,
            password_hash: row.password_hash,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl AccountStore for SqliteAccountStore {
    #[instrument(skip(self), err)]
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, email, password_hash, created_at, updated_at
            FROM accounts
            WHERE email = ?1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_account_by_email", e))?;

        row.map(Account::try_from).transpose()
    }

    #[instrument(skip(self, password_hash), err)]
    async fn insert(&self, email: &str, password_hash: &str) -> Result<Account, StoreError> {
        let now = Utc::now();
        let account = Account {
            id: AccountId::new(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO accounts (id, email, password_hash, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(account.id.to_string())
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_account", e))?;

        Ok(account)
    }
}

#[derive(Debug, Clone)]
pub struct SqliteProductStore {
    pool: SqlitePool,
}

impl SqliteProductStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

struct ProductRow {
    id: String,
    name: String,
    description: Option<String>,
    is_premium: bool,
    price_cents: Option<i64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl<'r> sqlx::FromRow<'r, SqliteRow> for ProductRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(ProductRow {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            is_premium: row.try_get("is_premium")?,
            price_cents: row.try_get("price_cents")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl TryFrom<ProductRow> for Product {
    type Error = StoreError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        Ok(Product {
            id: row.id.parse::<ProductId>().map_err(|e| corrupt("products.id", e))?,
            name: row.name,
            description: row.description,
            is_premium: row.is_premium,
            price: row
                .price_cents
                .map(Price::from_cents)
                .transpose()
                .map_err(|e| corrupt("products.price_cents", e))?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl ProductStore for SqliteProductStore {
    #[instrument(skip(self), err)]
    async fn list(&self) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, description, is_premium, price_cents, created_at, updated_at
            FROM products
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_products", e))?;

        rows.into_iter().map(Product::try_from).collect()
    }

    #[instrument(skip(self), fields(product_id = %id), err)]
    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, description, is_premium, price_cents, created_at, updated_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_product", e))?;

        row.map(Product::try_from).transpose()
    }

    #[instrument(skip(self, product), err)]
    async fn insert(&self, product: NewProduct) -> Result<Product, StoreError> {
        let product = product.into_product(ProductId::new(), Utc::now());

        sqlx::query(
            r#"
            INSERT INTO products (id, name, description, is_premium, price_cents, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(product.id.to_string())
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.is_premium)
        .bind(product.price.map(|p| p.cents()))
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_product", e))?;

        Ok(product)
    }

    #[instrument(skip(self, product), fields(product_id = %product.id), err)]
    async fn save(&self, product: &Product) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = ?2, description = ?3, is_premium = ?4, price_cents = ?5, updated_at = ?6
            WHERE id = ?1
            "#,
        )
        .bind(product.id.to_string())
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.is_premium)
        .bind(product.price.map(|p| p.cents()))
        .bind(product.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("save_product", e))?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self), fields(product_id = %id), err)]
    async fn delete(&self, id: &ProductId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_product", e))?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    async fn pool() -> SqlitePool {
        db::connect(db::IN_MEMORY).await.unwrap()
    }

    fn coffee() -> NewProduct {
        NewProduct {
            name: "Coffee".to_string(),
            description: Some("Arabica".to_string()),
            is_premium: true,
            price: Some(Price::from_cents(2550).unwrap()),
        }
    }

    #[tokio::test]
    async fn product_round_trips_through_sqlite() {
        let store = SqliteProductStore::new(pool().await);
        let created = store.insert(coffee()).await.unwrap();

        let found = store.find_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(found, created);
    }

    #[tokio::test]
    async fn save_overwrites_fields() {
        let store = SqliteProductStore::new(pool().await);
        let mut p = store.insert(coffee()).await.unwrap();
        p.name = "Decaf".to_string();
        p.price = None;
        p.is_premium = false;
        p.updated_at = Utc::now();

        assert!(store.save(&p).await.unwrap());
        assert_eq!(store.find_by_id(&p.id).await.unwrap(), Some(p));
    }

    #[tokio::test]
    async fn save_of_a_deleted_row_reports_nothing_written() {
        let store = SqliteProductStore::new(pool().await);
        let p = store.insert(coffee()).await.unwrap();
        assert!(store.delete(&p.id).await.unwrap());

        assert!(!store.save(&p).await.unwrap());
        assert_eq!(store.find_by_id(&p.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn list_is_oldest_first_and_delete_removes() {
        let store = SqliteProductStore::new(pool().await);
        let a = store.insert(coffee()).await.unwrap();
        let b = store.insert(coffee()).await.unwrap();

        let ids: Vec<_> = store.list().await.unwrap().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![a.id, b.id]);

        assert!(store.delete(&a.id).await.unwrap());
        assert!(!store.delete(&a.id).await.unwrap());
        let ids: Vec<_> = store.list().await.unwrap().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![b.id]);
    }

    #[tokio::test]
    async fn unique_email_constraint_surfaces_as_duplicate() {
        let store = SqliteAccountStore::new(pool().await);
        let account = store.insert("ada@example.com", "digest").await.unwrap();

        let err = store.insert("ada@example.com", "other").await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));

        let found = store.find_by_email("ada@example.com").await.unwrap().unwrap();
        assert_eq!(found.id, account.id);
        assert_eq!(found.password_hash, "digest");
        assert_eq!(store.find_by_email("ADA@example.com").await.unwrap(), None);
    }
}
