//! In-memory product repository for tests and local development.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{ProductError, Result};
use crate::models::{Product, ProductFilter};
use crate::repository::ProductRepository;

/// HashMap-backed repository. Counter increments take the write lock
/// for the whole read-modify-write, so concurrent bumps never lose
/// updates.
#[derive(Clone, Default)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<HashMap<Uuid, Product>>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, product: Product) -> Result<Product> {
        let mut products = self.products.write().await;
        if products
            .values()
            .any(|p| p.sku.eq_ignore_ascii_case(&product.sku))
        {
            return Err(ProductError::DuplicateSku(product.sku));
        }
        products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Product>> {
        Ok(self.products.read().await.get(&id).cloned())
    }

    async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>> {
        let products = self.products.read().await;
        let mut matched: Vec<Product> = products
            .values()
            .filter(|p| {
                filter
                    .brand
                    .as_deref()
                    .is_none_or(|b| p.brand.eq_ignore_ascii_case(b))
            })
            .filter(|p| {
                filter.search.as_deref().is_none_or(|q| {
                    let q = q.to_lowercase();
                    p.name.to_lowercase().contains(&q)
                        || p.sku.to_lowercase().contains(&q)
                        || p.brand.to_lowercase().contains(&q)
                })
            })
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matched
            .into_iter()
            .skip(filter.offset as usize)
            .take(filter.effective_limit() as usize)
            .collect())
    }

    async fn update(&self, product: Product) -> Result<Product> {
        let mut products = self.products.write().await;
        if !products.contains_key(&product.id) {
            return Err(ProductError::NotFound(product.id));
        }
        products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        Ok(self.products.write().await.remove(&id).is_some())
    }

    async fn all(&self) -> Result<Vec<Product>> {
        Ok(self.products.read().await.values().cloned().collect())
    }

    async fn sku_exists(&self, sku: &str) -> Result<bool> {
        Ok(self
            .products
            .read()
            .await
            .values()
            .any(|p| p.sku.eq_ignore_ascii_case(sku)))
    }

    async fn increment_view_count(&self, id: Uuid) -> Result<()> {
        let mut products = self.products.write().await;
        let product = products
            .get_mut(&id)
            .ok_or(ProductError::NotFound(id))?;
        product.view_count += 1;
        product.last_viewed = Some(Utc::now());
        Ok(())
    }

    async fn increment_list_view_count(&self) -> Result<()> {
        let mut products = self.products.write().await;
        for product in products.values_mut() {
            product.list_view_count += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CreateProduct;

    fn input(sku: &str, name: &str, brand: &str) -> CreateProduct {
        CreateProduct {
            sku: sku.to_string(),
            name: name.to_string(),
            brand: brand.to_string(),
            price_cents: 1999,
        }
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_sku() {
        let repo = InMemoryProductRepository::new();
        repo.create(Product::new(input("ABC-1", "Widget", "Acme"), None))
            .await
            .unwrap();

        let err = repo
            .create(Product::new(input("abc-1", "Other", "Acme"), None))
            .await
            .unwrap_err();
        assert!(matches!(err, ProductError::DuplicateSku(_)));
    }

    #[tokio::test]
    async fn test_list_filters_by_brand_and_search() {
        let repo = InMemoryProductRepository::new();
        repo.create(Product::new(input("A-1", "Hammer", "Acme"), None))
            .await
            .unwrap();
        repo.create(Product::new(input("B-1", "Wrench", "Bolts Inc"), None))
            .await
            .unwrap();

        let by_brand = repo
            .list(&ProductFilter {
                brand: Some("acme".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_brand.len(), 1);
        assert_eq!(by_brand[0].sku, "A-1");

        let by_search = repo
            .list(&ProductFilter {
                search: Some("wren".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_search.len(), 1);
        assert_eq!(by_search[0].sku, "B-1");
    }

    #[tokio::test]
    async fn test_list_ignores_negative_limit() {
        let repo = InMemoryProductRepository::new();
        repo.create(Product::new(input("A-1", "Hammer", "Acme"), None))
            .await
            .unwrap();

        let listed = repo
            .list(&ProductFilter {
                limit: -1,
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_view_increments_are_not_lost() {
        let repo = InMemoryProductRepository::new();
        let product = repo
            .create(Product::new(input("C-1", "Gadget", "Acme"), None))
            .await
            .unwrap();

        let mut handles = Vec::new();
        for _ in 0..100 {
            let repo = repo.clone();
            let id = product.id;
            handles.push(tokio::spawn(async move {
                repo.increment_view_count(id).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let updated = repo.get_by_id(product.id).await.unwrap().unwrap();
        assert_eq!(updated.view_count, 100);
        assert!(updated.last_viewed.is_some());
    }

    #[tokio::test]
    async fn test_list_increment_touches_every_product() {
        let repo = InMemoryProductRepository::new();
        let a = repo
            .create(Product::new(input("A-1", "Hammer", "Acme"), None))
            .await
            .unwrap();
        let b = repo
            .create(Product::new(input("B-1", "Wrench", "Acme"), None))
            .await
            .unwrap();

        repo.increment_list_view_count().await.unwrap();
        repo.increment_list_view_count().await.unwrap();

        for id in [a.id, b.id] {
            let p = repo.get_by_id(id).await.unwrap().unwrap();
            assert_eq!(p.list_view_count, 2);
            // list views do not count as product views
            assert_eq!(p.view_count, 0);
            assert!(p.last_viewed.is_none());
        }
    }

    #[tokio::test]
    async fn test_delete_reports_whether_removed() {
        let repo = InMemoryProductRepository::new();
        let p = repo
            .create(Product::new(input("D-1", "Hammer", "Acme"), None))
            .await
            .unwrap();

        assert!(repo.delete(p.id).await.unwrap());
        assert!(!repo.delete(p.id).await.unwrap());
    }
}
