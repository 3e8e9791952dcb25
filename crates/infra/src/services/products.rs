use std::sync::Arc;

use chrono::Utc;

use shelf_core::{DomainError, ProductId};
use shelf_products::{NewProduct, Product, ProductPatch};

use super::ServiceError;
use crate::store::ProductStore;

/// CRUD rules over products: existence checks and partial-update merge.
#[derive(Clone)]
pub struct ProductService {
    store: Arc<dyn ProductStore>,
}

fn not_found(id: &str) -> ServiceError {
    DomainError::not_found(format!("Product with ID {id} not found")).into()
}

impl ProductService {
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        Self { store }
    }

    pub async fn find_all(&self) -> Result<Vec<Product>, ServiceError> {
        Ok(self.store.list().await?)
    }

    /// Look up a product by its client-facing id.
    ///
    /// Ids are opaque to clients, so one that does not even parse is reported
    /// exactly like one that is not stored.
    pub async fn find_one(&self, id: &str) -> Result<Product, ServiceError> {
        let Ok(product_id) = id.parse::<ProductId>() else {
            return Err(not_found(id));
        };

        self.store.find_by_id(&product_id).await?.ok_or_else(|| not_found(id))
    }

    pub async fn create(&self, input: NewProduct) -> Result<Product, ServiceError> {
        input.ensure_priced_if_premium()?;

        let product = self.store.insert(input).await?;
        tracing::info!(product_id = %product.id, "product created");
        Ok(product)
    }

    /// Merge `patch` onto the stored product and persist it.
    ///
    /// The merged record must still satisfy the premium/price rule; the
    /// request alone cannot show that, since it only carries changed fields.
    pub async fn update(&self, id: &str, patch: ProductPatch) -> Result<Product, ServiceError> {
        let mut product = self.find_one(id).await?;

        product.apply(patch, Utc::now());
        product.ensure_priced_if_premium()?;

        // A concurrent delete after the lookup is still a 404.
        if !self.store.save(&product).await? {
            return Err(not_found(id));
        }
        tracing::info!(product_id = %product.id, "product updated");
        Ok(product)
    }

    pub async fn remove(&self, id: &str) -> Result<(), ServiceError> {
        let product = self.find_one(id).await?;

        // A concurrent delete between the lookup and here is still a 404.
        if !self.store.delete(&product.id).await? {
            return Err(not_found(id));
        }
        tracing::info!(product_id = %product.id, "product deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::Duration;
    use shelf_products::Price;

    use crate::store::{InMemoryProductStore, StoreError};

    /// Counts calls to the delete primitive.
    #[derive(Default)]
    struct CountingStore {
        inner: InMemoryProductStore,
        deletes: AtomicUsize,
    }

    #[async_trait]
    impl ProductStore for CountingStore {
        async fn list(&self) -> Result<Vec<Product>, StoreError> {
            self.inner.list().await
        }

        async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, StoreError> {
            self.inner.find_by_id(id).await
        }

        async fn insert(&self, product: NewProduct) -> Result<Product, StoreError> {
            self.inner.insert(product).await
        }

        async fn save(&self, product: &Product) -> Result<bool, StoreError> {
            self.inner.save(product).await
        }

        async fn delete(&self, id: &ProductId) -> Result<bool, StoreError> {
            self.deletes.fetch_add(1, Ordering::SeqCst);
            self.inner.delete(id).await
        }
    }

    fn setup() -> (ProductService, Arc<CountingStore>) {
        let store = Arc::new(CountingStore::default());
        (ProductService::new(store.clone()), store)
    }

    fn coffee() -> NewProduct {
        NewProduct {
            name: "Coffee".to_string(),
            description: None,
            is_premium: true,
            price: Some(Price::from_decimal(25.50).unwrap()),
        }
    }

    fn tea() -> NewProduct {
        NewProduct {
            name: "Tea".to_string(),
            description: Some("Green".to_string()),
            is_premium: false,
            price: None,
        }
    }

    fn assert_not_found(err: ServiceError, id: &str) {
        assert_eq!(
            err.domain(),
            Some(&DomainError::not_found(format!("Product with ID {id} not found")))
        );
    }

    #[tokio::test]
    async fn created_product_reads_back_identically() {
        let (svc, _) = setup();
        let created = svc.create(coffee()).await.unwrap();

        let found = svc.find_one(&created.id.to_string()).await.unwrap();
        assert_eq!(found, created);
        assert_eq!(found.price.unwrap().cents(), 2550);
    }

    #[tokio::test]
    async fn unknown_and_malformed_ids_are_not_found() {
        let (svc, _) = setup();
        let missing = ProductId::new().to_string();

        assert_not_found(svc.find_one(&missing).await.unwrap_err(), &missing);
        assert_not_found(svc.find_one("abc").await.unwrap_err(), "abc");
        assert_not_found(
            svc.update("abc", ProductPatch::default()).await.unwrap_err(),
            "abc",
        );
    }

    #[tokio::test]
    async fn remove_of_missing_product_never_calls_delete() {
        let (svc, store) = setup();
        let missing = ProductId::new().to_string();

        assert_not_found(svc.remove(&missing).await.unwrap_err(), &missing);
        assert_eq!(store.deletes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn second_remove_is_not_found() {
        let (svc, store) = setup();
        let id = svc.create(tea()).await.unwrap().id.to_string();

        svc.remove(&id).await.unwrap();
        assert_not_found(svc.remove(&id).await.unwrap_err(), &id);
        assert_eq!(store.deletes.load(Ordering::SeqCst), 1);
    }

    /// Drops the product right after every lookup, as if another request
    /// deleted it between read and write.
    #[derive(Default)]
    struct VanishingStore(InMemoryProductStore);

    #[async_trait]
    impl ProductStore for VanishingStore {
        async fn list(&self) -> Result<Vec<Product>, StoreError> {
            self.0.list().await
        }

        async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, StoreError> {
            let found = self.0.find_by_id(id).await?;
            self.0.delete(id).await?;
            Ok(found)
        }

        async fn insert(&self, product: NewProduct) -> Result<Product, StoreError> {
            self.0.insert(product).await
        }

        async fn save(&self, product: &Product) -> Result<bool, StoreError> {
            self.0.save(product).await
        }

        async fn delete(&self, id: &ProductId) -> Result<bool, StoreError> {
            self.0.delete(id).await
        }
    }

    #[tokio::test]
    async fn update_racing_a_delete_is_not_found() {
        let store = Arc::new(VanishingStore::default());
        let svc = ProductService::new(store.clone());
        let id = svc.create(tea()).await.unwrap().id.to_string();

        let err = svc.update(&id, ProductPatch::default()).await.unwrap_err();
        assert_not_found(err, &id);
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_merges_only_present_fields() {
        let (svc, _) = setup();
        let created = svc.create(coffee()).await.unwrap();

        let updated = svc
            .update(
                &created.id.to_string(),
                ProductPatch {
                    name: Some("X".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "X");
        assert_eq!(updated.price, created.price);
        assert_eq!(updated.description, created.description);
        assert_eq!(updated.is_premium, created.is_premium);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);

        let stored = svc.find_one(&created.id.to_string()).await.unwrap();
        assert_eq!(stored, updated);
    }

    #[tokio::test]
    async fn update_refuses_to_leave_a_premium_product_unpriced() {
        let (svc, _) = setup();
        let created = svc.create(coffee()).await.unwrap();
        let id = created.id.to_string();

        let err = svc
            .update(
                &id,
                ProductPatch {
                    price: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err.domain(), Some(DomainError::Validation(_))));

        // Nothing was persisted.
        assert_eq!(svc.find_one(&id).await.unwrap(), created);

        // Dropping premium and price together is fine.
        let updated = svc
            .update(
                &id,
                ProductPatch {
                    is_premium: Some(false),
                    price: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(!updated.is_premium);
        assert_eq!(updated.price, None);
    }

    #[tokio::test]
    async fn create_rejects_unpriced_premium_product() {
        let (svc, store) = setup();
        let err = svc
            .create(NewProduct {
                price: None,
                ..coffee()
            })
            .await
            .unwrap_err();

        assert!(matches!(err.domain(), Some(DomainError::Validation(_))));
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_list_delete_scenario() {
        let (svc, _) = setup();
        let a = svc.create(tea()).await.unwrap();
        let id = a.id.to_string();

        assert!(svc.find_all().await.unwrap().iter().any(|p| p.id == a.id));

        svc.remove(&id).await.unwrap();
        assert!(!svc.find_all().await.unwrap().iter().any(|p| p.id == a.id));
        assert_not_found(svc.find_one(&id).await.unwrap_err(), &id);
    }

    #[tokio::test]
    async fn updated_at_moves_forward() {
        let (svc, _) = setup();
        let created = svc.create(tea()).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;

        let updated = svc
            .update(&created.id.to_string(), ProductPatch::default())
            .await
            .unwrap();
        assert!(updated.updated_at - created.updated_at >= Duration::milliseconds(5));
    }
}
