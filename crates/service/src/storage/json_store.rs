use std::{
    collections::HashMap,
    path::PathBuf,
    sync::atomic::{AtomicBool, Ordering},
    sync::Arc,
};

use async_trait::async_trait;
use models::product::Product;
use tokio::{fs, sync::RwLock};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::storage::ProductStore;

/// JSON file-backed product store.
///
/// Persists a `HashMap<Uuid, Product>` to a JSON file after every mutation.
/// Intended for a single-service deployment where a database server is
/// overkill; the `ProductStore` trait is the seam for swapping in a real
/// document-store driver.
pub struct JsonProductStore {
    inner: Arc<RwLock<HashMap<Uuid, Product>>>,
    file_path: PathBuf,
    closed: AtomicBool,
}

impl JsonProductStore {
    /// Open the store from a path. Creates the file with an empty collection
    /// if missing; any other I/O failure is a startup-fatal storage error.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await.ok();
        }

        let map: HashMap<Uuid, Product> = match fs::read(&file_path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| ServiceError::Storage(format!("corrupt store file: {e}")))?,
            Err(_) => {
                let empty: HashMap<Uuid, Product> = HashMap::new();
                fs::write(
                    &file_path,
                    serde_json::to_vec(&empty).map_err(|e| ServiceError::Storage(e.to_string()))?,
                )
                .await
                .map_err(|e| ServiceError::Storage(e.to_string()))?;
                empty
            }
        };

        Ok(Arc::new(Self {
            inner: Arc::new(RwLock::new(map)),
            file_path,
            closed: AtomicBool::new(false),
        }))
    }

    fn ensure_open(&self) -> Result<(), ServiceError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(ServiceError::Storage("store is closed".into()));
        }
        Ok(())
    }

    async fn save(&self) -> Result<(), ServiceError> {
        let map = self.inner.read().await;
        let data = serde_json::to_vec(&*map).map_err(|e| ServiceError::Storage(e.to_string()))?;
        fs::write(&self.file_path, data)
            .await
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl ProductStore for JsonProductStore {
    async fn list(&self) -> Result<Vec<Product>, ServiceError> {
        self.ensure_open()?;
        let map = self.inner.read().await;
        Ok(map.values().cloned().collect())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Product>, ServiceError> {
        self.ensure_open()?;
        let map = self.inner.read().await;
        Ok(map.get(&id).cloned())
    }

    async fn insert(&self, product: Product) -> Result<(), ServiceError> {
        self.ensure_open()?;
        let mut map = self.inner.write().await;
        map.insert(product.id, product);
        drop(map);
        self.save().await
    }

    async fn update(&self, id: Uuid, product: Product) -> Result<Product, ServiceError> {
        self.ensure_open()?;
        let mut map = self.inner.write().await;
        match map.get_mut(&id) {
            Some(slot) => *slot = product.clone(),
            None => return Err(ServiceError::not_found("product")),
        }
        drop(map);
        self.save().await?;
        Ok(product)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        self.ensure_open()?;
        let mut map = self.inner.write().await;
        let existed = map.remove(&id).is_some();
        drop(map);
        self.save().await?;
        Ok(existed)
    }

    async fn close(&self) -> Result<(), ServiceError> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        // final flush; mutations already persist eagerly, so this only
        // matters if the last write raced a crash
        self.save().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::product::NewProduct;

    fn sample(name: &str, sku: &str) -> Product {
        NewProduct {
            name: name.into(),
            description: String::new(),
            price: 1.99,
            sku: sku.into(),
        }
        .into_product()
    }

    fn temp_path() -> PathBuf {
        std::env::temp_dir().join(format!("json_product_store_{}.json", Uuid::new_v4()))
    }

    #[tokio::test]
    async fn crud_persists_across_reopen() -> Result<(), anyhow::Error> {
        let tmp = temp_path();
        let store = JsonProductStore::open(&tmp).await?;

        assert_eq!(store.list().await?.len(), 0);

        let espresso = sample("Espresso", "esp-sho-one");
        let latte = sample("Latte", "lat-mil-cof");
        store.insert(espresso.clone()).await?;
        store.insert(latte.clone()).await?;
        assert_eq!(store.list().await?.len(), 2);
        assert_eq!(store.get(espresso.id).await?.as_ref(), Some(&espresso));

        let mut updated = latte.clone();
        updated.price = 3.25;
        let returned = store.update(latte.id, updated.clone()).await?;
        assert_eq!(returned.price, 3.25);

        let reloaded = JsonProductStore::open(&tmp).await?;
        assert_eq!(reloaded.list().await?.len(), 2);
        assert_eq!(reloaded.get(latte.id).await?.unwrap().price, 3.25);

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn update_absent_id_is_typed_not_found() -> Result<(), anyhow::Error> {
        let tmp = temp_path();
        let store = JsonProductStore::open(&tmp).await?;
        let ghost = sample("Ghost", "gho-sto-sku");
        let err = store.update(Uuid::new_v4(), ghost).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn delete_twice_reports_absence_second_time() -> Result<(), anyhow::Error> {
        let tmp = temp_path();
        let store = JsonProductStore::open(&tmp).await?;
        let p = sample("Mocha", "moc-cho-cof");
        store.insert(p.clone()).await?;
        assert!(store.delete(p.id).await?);
        assert!(!store.delete(p.id).await?);
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn close_is_idempotent_and_fences_operations() -> Result<(), anyhow::Error> {
        let tmp = temp_path();
        let store = JsonProductStore::open(&tmp).await?;
        store.insert(sample("Flat White", "fla-whi-cof")).await?;

        store.close().await?;
        store.close().await?;

        let err = store.list().await.unwrap_err();
        assert!(matches!(err, ServiceError::Storage(_)));
        let err = store.insert(sample("Too Late", "too-lat-cof")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Storage(_)));

        // the flush before closing kept the data on disk
        let reloaded = JsonProductStore::open(&tmp).await?;
        assert_eq!(reloaded.list().await?.len(), 1);

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }
}
