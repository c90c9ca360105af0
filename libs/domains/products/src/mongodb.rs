//! MongoDB implementation of ProductRepository

use async_trait::async_trait;
use mongodb::{
    bson::{doc, to_bson, Bson},
    options::IndexOptions,
    Collection, Database, IndexModel,
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{ProductError, Result};
use crate::models::{Product, ProductFilter};
use crate::repository::ProductRepository;

/// MongoDB implementation of the ProductRepository
pub struct MongoProductRepository {
    collection: Collection<Product>,
}

impl MongoProductRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.collection::<Product>("products");
        Self { collection }
    }

    /// Initialize indexes for optimal query performance
    pub async fn init_indexes(&self) -> Result<()> {
        let indexes = vec![
            // Unique SKU index
            IndexModel::builder()
                .keys(doc! { "sku": 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name("idx_sku_unique".to_string())
                        .build(),
                )
                .build(),
            // Brand + recency for listing
            IndexModel::builder()
                .keys(doc! { "brand": 1, "created_at": -1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_brand_created".to_string())
                        .build(),
                )
                .build(),
            // Analytics windows scan by last view time
            IndexModel::builder()
                .keys(doc! { "last_viewed": -1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_last_viewed".to_string())
                        .build(),
                )
                .build(),
            // Top-N by view count
            IndexModel::builder()
                .keys(doc! { "view_count": -1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_view_count".to_string())
                        .build(),
                )
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("Product indexes created successfully");
        Ok(())
    }

    /// Build a MongoDB filter document from ProductFilter
    fn build_filter(filter: &ProductFilter) -> mongodb::bson::Document {
        let mut doc = doc! {};

        if let Some(ref brand) = filter.brand {
            doc.insert("brand", brand);
        }

        if let Some(ref search) = filter.search {
            doc.insert(
                "$or",
                vec![
                    doc! { "name": { "$regex": search, "$options": "i" } },
                    doc! { "sku": { "$regex": search, "$options": "i" } },
                    doc! { "brand": { "$regex": search, "$options": "i" } },
                ],
            );
        }

        doc
    }
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    #[instrument(skip(self, product), fields(sku = %product.sku))]
    async fn create(&self, product: Product) -> Result<Product> {
        if self.sku_exists(&product.sku).await? {
            return Err(ProductError::DuplicateSku(product.sku));
        }

        self.collection.insert_one(&product).await?;

        tracing::info!(product_id = %product.id, "Product created successfully");
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Product>> {
        let filter = doc! { "_id": to_bson(&id).unwrap_or(Bson::Null) };
        let product = self.collection.find_one(filter).await?;
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>> {
        use futures_util::TryStreamExt;

        let mongo_filter = Self::build_filter(filter);

        let options = mongodb::options::FindOptions::builder()
            .limit(filter.effective_limit())
            .skip(filter.offset)
            .sort(doc! { "created_at": -1 })
            .build();

        let cursor = self
            .collection
            .find(mongo_filter)
            .with_options(options)
            .await?;
        let products: Vec<Product> = cursor.try_collect().await?;

        Ok(products)
    }

    #[instrument(skip(self, product), fields(product_id = %product.id))]
    async fn update(&self, product: Product) -> Result<Product> {
        let filter = doc! { "_id": to_bson(&product.id).unwrap_or(Bson::Null) };
        let result = self.collection.replace_one(filter, &product).await?;

        if result.matched_count == 0 {
            return Err(ProductError::NotFound(product.id));
        }

        tracing::info!(product_id = %product.id, "Product updated successfully");
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> Result<bool> {
        let filter = doc! { "_id": to_bson(&id).unwrap_or(Bson::Null) };
        let result = self.collection.delete_one(filter).await?;

        Ok(result.deleted_count > 0)
    }

    #[instrument(skip(self))]
    async fn all(&self) -> Result<Vec<Product>> {
        use futures_util::TryStreamExt;

        let cursor = self.collection.find(doc! {}).await?;
        let products: Vec<Product> = cursor.try_collect().await?;

        Ok(products)
    }

    #[instrument(skip(self))]
    async fn sku_exists(&self, sku: &str) -> Result<bool> {
        let filter = doc! { "sku": sku };
        let count = self.collection.count_documents(filter).await?;
        Ok(count > 0)
    }

    #[instrument(skip(self))]
    async fn increment_view_count(&self, id: Uuid) -> Result<()> {
        let filter = doc! { "_id": to_bson(&id).unwrap_or(Bson::Null) };

        // Single server-side update keeps concurrent bumps atomic
        let update = doc! {
            "$inc": { "view_count": 1 },
            "$set": { "last_viewed": chrono::Utc::now().to_rfc3339() }
        };

        let result = self.collection.update_one(filter, update).await?;
        if result.matched_count == 0 {
            return Err(ProductError::NotFound(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn increment_list_view_count(&self) -> Result<()> {
        self.collection
            .update_many(doc! {}, doc! { "$inc": { "list_view_count": 1 } })
            .await?;

        Ok(())
    }
}
