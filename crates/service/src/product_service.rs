use std::sync::Arc;

use models::product::{NewProduct, Product};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::storage::ProductStore;

/// Application service encapsulating product business rules: identity and
/// timestamp stamping on create, fetch-apply semantics on update. Generic over
/// the store so handlers and tests can supply `Arc<dyn ProductStore>`.
pub struct ProductService<S: ProductStore + ?Sized> {
    store: Arc<S>,
}

impl<S: ProductStore + ?Sized> ProductService<S> {
    pub fn new(store: Arc<S>) -> Self { Self { store } }

    pub async fn list(&self) -> Result<Vec<Product>, ServiceError> {
        self.store.list().await
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Product>, ServiceError> {
        self.store.get(id).await
    }

    #[instrument(skip(self, input), fields(sku = %input.sku))]
    pub async fn create(&self, input: NewProduct) -> Result<Product, ServiceError> {
        let product = input.into_product();
        self.store.insert(product.clone()).await?;
        info!(id = %product.id, "product created");
        Ok(product)
    }

    /// Update keeps `id` and `created_at` stable; an absent id surfaces as a
    /// typed `NotFound`.
    pub async fn update(&self, id: Uuid, input: NewProduct) -> Result<Product, ServiceError> {
        let mut existing = self
            .store
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("product"))?;
        existing.apply(input);
        self.store.update(id, existing).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        self.store.delete(id).await
    }

    pub async fn close(&self) -> Result<(), ServiceError> {
        self.store.close().await
    }
}
