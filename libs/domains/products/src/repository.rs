//! Product persistence abstraction.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Product, ProductFilter};

/// Storage backend for the product catalog.
///
/// Counter increments are separate operations so backends can apply
/// them atomically instead of read-modify-write on the whole document.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create(&self, product: Product) -> Result<Product>;

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Product>>;

    async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>>;

    async fn update(&self, product: Product) -> Result<Product>;

    /// Returns true when a document was actually removed.
    async fn delete(&self, id: Uuid) -> Result<bool>;

    /// Full catalog scan for stats and analytics aggregation.
    async fn all(&self) -> Result<Vec<Product>>;

    async fn sku_exists(&self, sku: &str) -> Result<bool>;

    /// Atomically bump a single product's view counter and stamp
    /// `last_viewed`.
    async fn increment_view_count(&self, id: Uuid) -> Result<()>;

    /// Atomically bump the list-view counter on every product.
    async fn increment_list_view_count(&self) -> Result<()>;
}
