use async_trait::async_trait;
use models::product::Product;
use uuid::Uuid;

use crate::errors::ServiceError;

pub mod json_store;

pub use json_store::JsonProductStore;

/// The document-store collaborator consumed by handlers and the lifecycle
/// coordinator. "Not found" is part of the typed contract: `update` fails
/// with `ServiceError::NotFound` and `delete` reports absence as `Ok(false)`,
/// so callers never have to infer it from a generic error.
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Product>, ServiceError>;
    async fn get(&self, id: Uuid) -> Result<Option<Product>, ServiceError>;
    async fn insert(&self, product: Product) -> Result<(), ServiceError>;
    async fn update(&self, id: Uuid, product: Product) -> Result<Product, ServiceError>;
    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError>;
    /// Flush and reject further operations. Idempotent; a second call is a
    /// no-op success.
    async fn close(&self) -> Result<(), ServiceError>;
}
