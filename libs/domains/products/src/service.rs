//! Product Service - Business logic layer

use std::sync::Arc;

use chrono::Utc;
use email::{ProductEventJob, ProductEventKind, ProductSnapshot};
use queue_worker::JobQueue;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::analytics::{
    compute_stats, compute_view_analytics, AnalyticsRange, CatalogStats, ViewAnalytics,
};
use crate::changes::detect_changes;
use crate::error::{ProductError, Result};
use crate::models::{Actor, CreateProduct, Product, ProductFilter, UpdateProduct};
use crate::repository::ProductRepository;

/// Product service providing business logic operations
///
/// The service layer handles validation, change detection and
/// notification dispatch on top of the repository. Notification
/// enqueue is fire-and-forget: a full queue never fails the mutation
/// that triggered it.
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
    notifications: Option<JobQueue<ProductEventJob>>,
}

impl<R: ProductRepository> Clone for ProductService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            notifications: self.notifications.clone(),
        }
    }
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            notifications: None,
        }
    }

    /// Attach the notification queue mutations publish to.
    pub fn with_notifications(mut self, queue: JobQueue<ProductEventJob>) -> Self {
        self.notifications = Some(queue);
        self
    }

    /// Create a new product
    #[instrument(skip(self, input, actor), fields(sku = %input.sku, actor = %actor.username))]
    pub async fn create_product(&self, input: CreateProduct, actor: &Actor) -> Result<Product> {
        input
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        if self.repository.sku_exists(&input.sku).await? {
            return Err(ProductError::DuplicateSku(input.sku));
        }

        let product = self
            .repository
            .create(Product::new(input, Some(actor.id)))
            .await?;

        self.notify(ProductEventJob::new(ProductEventKind::Created, snapshot(&product))
            .with_actor(actor.id, &actor.username))
            .await;

        Ok(product)
    }

    /// Get a product by ID
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: Uuid) -> Result<Product> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    /// List products with optional filters
    #[instrument(skip(self))]
    pub async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<Product>> {
        self.repository.list(filter).await
    }

    /// Update an existing product
    ///
    /// A non-empty diff over the significant fields enqueues an
    /// `updated` notification carrying the old and new values.
    #[instrument(skip(self, input, actor), fields(actor = %actor.username))]
    pub async fn update_product(
        &self,
        id: Uuid,
        input: UpdateProduct,
        actor: &Actor,
    ) -> Result<Product> {
        input
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        let existing = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))?;

        let mut updated = existing.clone();
        updated.apply_update(input, Some(actor.id));
        let updated = self.repository.update(updated).await?;

        let changes = detect_changes(&existing, &updated);
        if !changes.is_empty() {
            self.notify(
                ProductEventJob::new(ProductEventKind::Updated, snapshot(&updated))
                    .with_changes(changes)
                    .with_actor(actor.id, &actor.username),
            )
            .await;
        }

        Ok(updated)
    }

    /// Delete a product
    #[instrument(skip(self, actor), fields(actor = %actor.username))]
    pub async fn delete_product(&self, id: Uuid, actor: &Actor) -> Result<()> {
        // Snapshot before deleting so the notification still has the data
        let existing = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))?;

        if !self.repository.delete(id).await? {
            return Err(ProductError::NotFound(id));
        }

        self.notify(ProductEventJob::new(ProductEventKind::Deleted, snapshot(&existing))
            .with_actor(actor.id, &actor.username))
            .await;

        Ok(())
    }

    /// Bump a product's detail view counter.
    ///
    /// Failures are logged and swallowed; the read path never fails
    /// because of tracking.
    pub async fn record_product_view(&self, id: Uuid) {
        if let Err(err) = self.repository.increment_view_count(id).await {
            tracing::error!(product_id = %id, error = %err, "Failed to record product view");
        }
    }

    /// Bump the catalog list view counter on every product.
    pub async fn record_list_view(&self) {
        if let Err(err) = self.repository.increment_list_view_count().await {
            tracing::error!(error = %err, "Failed to record list view");
        }
    }

    /// Aggregate catalog stats
    #[instrument(skip(self))]
    pub async fn stats(&self) -> Result<CatalogStats> {
        let products = self.repository.all().await?;
        Ok(compute_stats(&products))
    }

    /// Windowed view analytics
    #[instrument(skip(self))]
    pub async fn view_analytics(&self, range: AnalyticsRange) -> Result<ViewAnalytics> {
        let products = self.repository.all().await?;
        Ok(compute_view_analytics(&products, range, Utc::now()))
    }

    async fn notify(&self, job: ProductEventJob) {
        let Some(queue) = &self.notifications else {
            return;
        };
        if let Err(err) = queue.enqueue(job).await {
            tracing::error!(error = %err, "Failed to enqueue product notification");
        }
    }
}

fn snapshot(product: &Product) -> ProductSnapshot {
    ProductSnapshot {
        id: product.id,
        name: product.name.clone(),
        brand: product.brand.clone(),
        sku: product.sku.clone(),
        price_cents: product.price_cents,
        updated_at: product.updated_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryProductRepository;
    use queue_worker::{JobQueue, QueueWorker, WorkerConfig};

    fn actor() -> Actor {
        Actor {
            id: Uuid::now_v7(),
            username: "admin".to_string(),
        }
    }

    fn service() -> ProductService<InMemoryProductRepository> {
        ProductService::new(Arc::new(InMemoryProductRepository::new()))
    }

    fn input(sku: &str) -> CreateProduct {
        CreateProduct {
            sku: sku.to_string(),
            name: "Widget".to_string(),
            brand: "Acme".to_string(),
            price_cents: 1999,
        }
    }

    /// Queue with no worker attached, for observing what gets enqueued.
    fn capture_queue() -> (
        JobQueue<ProductEventJob>,
        tokio::sync::mpsc::Receiver<ProductEventJob>,
    ) {
        let (tx, rx) = tokio::sync::mpsc::channel(16);
        (JobQueue::from_sender(tx), rx)
    }

    #[tokio::test]
    async fn test_create_product_enqueues_created_event() {
        let (queue, mut rx) = capture_queue();
        let service = service().with_notifications(queue);
        let actor = actor();

        let product = service.create_product(input("SKU-1"), &actor).await.unwrap();

        let job = rx.recv().await.unwrap();
        assert_eq!(job.kind, ProductEventKind::Created);
        assert_eq!(job.product.id, product.id);
        assert_eq!(job.actor_user_id, Some(actor.id));
        assert_eq!(product.created_by, Some(actor.id));
    }

    #[tokio::test]
    async fn test_update_without_significant_change_is_silent() {
        let (queue, mut rx) = capture_queue();
        let service = service().with_notifications(queue);
        let actor = actor();

        let product = service.create_product(input("SKU-1"), &actor).await.unwrap();
        rx.recv().await.unwrap(); // created event

        // Same values back: empty diff, no notification
        let update = UpdateProduct {
            name: Some(product.name.clone()),
            brand: None,
            price_cents: Some(product.price_cents),
        };
        service
            .update_product(product.id, update, &actor)
            .await
            .unwrap();

        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_price_update_carries_old_and_new_values() {
        let (queue, mut rx) = capture_queue();
        let service = service().with_notifications(queue);
        let actor = actor();

        let product = service.create_product(input("SKU-1"), &actor).await.unwrap();
        rx.recv().await.unwrap();

        let update = UpdateProduct {
            price_cents: Some(2499),
            ..Default::default()
        };
        service
            .update_product(product.id, update, &actor)
            .await
            .unwrap();

        let job = rx.recv().await.unwrap();
        assert_eq!(job.kind, ProductEventKind::Updated);
        let change = job.changes.get("price").unwrap();
        assert_eq!(change.old, "19.99");
        assert_eq!(change.new, "24.99");
        assert_eq!(job.changes.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_enqueues_snapshot_of_removed_product() {
        let (queue, mut rx) = capture_queue();
        let service = service().with_notifications(queue);
        let actor = actor();

        let product = service.create_product(input("SKU-1"), &actor).await.unwrap();
        rx.recv().await.unwrap();

        service.delete_product(product.id, &actor).await.unwrap();

        let job = rx.recv().await.unwrap();
        assert_eq!(job.kind, ProductEventKind::Deleted);
        assert_eq!(job.product.sku, "SKU-1");

        let err = service.get_product(product.id).await.unwrap_err();
        assert!(matches!(err, ProductError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_view_recording_never_notifies() {
        let (queue, mut rx) = capture_queue();
        let service = service().with_notifications(queue);
        let actor = actor();

        let product = service.create_product(input("SKU-1"), &actor).await.unwrap();
        rx.recv().await.unwrap();

        service.record_product_view(product.id).await;
        service.record_list_view().await;

        assert!(rx.try_recv().is_err());
        let fetched = service.get_product(product.id).await.unwrap();
        assert_eq!(fetched.view_count, 1);
        assert_eq!(fetched.list_view_count, 1);
    }

    #[tokio::test]
    async fn test_record_view_on_missing_product_is_swallowed() {
        let service = service();
        // must not panic or error
        service.record_product_view(Uuid::now_v7()).await;
    }

    #[tokio::test]
    async fn test_duplicate_sku_rejected() {
        let service = service();
        let actor = actor();

        service.create_product(input("SKU-1"), &actor).await.unwrap();
        let err = service
            .create_product(input("SKU-1"), &actor)
            .await
            .unwrap_err();
        assert!(matches!(err, ProductError::DuplicateSku(_)));
    }

    #[tokio::test]
    async fn test_mutations_survive_missing_worker() {
        // Queue wired to a stopped worker: enqueue errors are swallowed
        let (queue, worker) = QueueWorker::new(NoopProcessor, WorkerConfig::new("product-events"));
        drop(worker);

        let service = service().with_notifications(queue);
        let product = service
            .create_product(input("SKU-1"), &actor())
            .await
            .unwrap();
        assert_eq!(product.sku, "SKU-1");
    }

    #[tokio::test]
    async fn test_stats_propagates_storage_errors() {
        let mut mock = crate::repository::MockProductRepository::new();
        mock.expect_all()
            .returning(|| Err(ProductError::Database("connection reset".to_string())));

        let service = ProductService::new(Arc::new(mock));
        let err = service.stats().await.unwrap_err();
        assert!(matches!(err, ProductError::Database(_)));
    }

    struct NoopProcessor;

    #[async_trait::async_trait]
    impl queue_worker::JobProcessor<ProductEventJob> for NoopProcessor {
        async fn process(&self, _job: &ProductEventJob) -> std::result::Result<(), queue_worker::QueueError> {
            Ok(())
        }

        fn name(&self) -> &'static str {
            "noop"
        }
    }
}
