//! Router assembly and process wiring.
//!
//! The notification worker runs in-process, fed by a bounded channel.
//! The HTTP server and the worker share nothing except the queue
//! handle and the admin directory.

use std::sync::Arc;

use axum::{middleware, routing::get, Json, Router};
use axum_helpers::{create_app, identity_middleware, SessionStore};
use core_config::email::EmailBackend;
use domain_products::{
    InMemoryProductRepository, MongoProductRepository, ProductRepository, ProductService,
};
use domain_users::{
    handlers::AuthState, AdminDirectory, InMemoryUserRepository, MongoUserRepository,
    UserRepository, UserService,
};
use email::{
    MockSmtpProvider, ProductEventJob, ProductEventProcessor, SmtpConfig, SmtpProvider,
    TemplateEngine,
};
use queue_worker::{JobQueue, QueueError, QueueWorker, WorkerConfig};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tower_http::normalize_path::NormalizePath;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::Config;

/// A fully wired application: the router plus the handle to its
/// background notification worker.
pub struct Application {
    pub router: Router,
    pub notifications: NotificationHandle,
}

/// Handle to the in-process notification worker.
pub struct NotificationHandle {
    shutdown: watch::Sender<bool>,
    worker: JoinHandle<Result<(), QueueError>>,
    /// Present when the mock email backend is active; e2e tests use it
    /// to observe deliveries.
    pub mock_provider: Option<Arc<MockSmtpProvider>>,
}

impl NotificationHandle {
    /// Signal the worker to drain in-flight jobs and wait for it.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        match self.worker.await {
            Ok(Err(err)) => warn!(error = %err, "Notification worker exited with error"),
            Err(err) => warn!(error = %err, "Notification worker did not shut down cleanly"),
            Ok(Ok(())) => {}
        }
    }
}

/// Run the API with storage selected by configuration.
pub async fn run(config: Config) -> eyre::Result<()> {
    match config.mongodb.clone() {
        Some(mongo) => {
            info!(database = %mongo.database, "Connecting to MongoDB");
            let client = mongodb::Client::with_uri_str(&mongo.uri).await?;
            let db = client.database(&mongo.database);

            let users = Arc::new(MongoUserRepository::new(&db));
            let products = Arc::new(MongoProductRepository::new(&db));
            users.init_indexes().await?;
            products.init_indexes().await?;

            serve(config, users, products).await
        }
        None => {
            warn!("MONGO_URI not set, using in-memory storage");
            serve(
                config,
                Arc::new(InMemoryUserRepository::new()),
                Arc::new(InMemoryProductRepository::new()),
            )
            .await
        }
    }
}

async fn serve<U, P>(config: Config, users: Arc<U>, products: Arc<P>) -> eyre::Result<()>
where
    U: UserRepository + 'static,
    P: ProductRepository + 'static,
{
    let app = build(&config, users, products)?;

    create_app(app.router, &config.server).await?;

    app.notifications.stop().await;
    info!("Catalog API shutdown complete");
    Ok(())
}

/// Assemble the router and spawn the notification worker.
///
/// Exposed so end-to-end tests can drive the full stack in-memory.
pub fn build<U, P>(config: &Config, users: Arc<U>, products: Arc<P>) -> eyre::Result<Application>
where
    U: UserRepository + 'static,
    P: ProductRepository + 'static,
{
    let sessions = SessionStore::new(config.auth.session_ttl_secs);

    let (queue, notifications) = spawn_notifications(config, Arc::clone(&users))?;

    let auth_router = domain_users::handlers::router(AuthState {
        service: UserService::with_arc_repository(users, &config.auth),
        sessions: sessions.clone(),
    });

    let products_router =
        domain_products::handlers::router(ProductService::new(products).with_notifications(queue));

    let router = Router::new()
        .nest("/products", products_router)
        .merge(auth_router)
        .route("/health", get(health))
        .layer(middleware::from_fn_with_state(sessions, identity_middleware))
        .layer(TraceLayer::new_for_http());

    // The spec's collection endpoints use trailing slashes (`/products/`),
    // which a nested router does not match on its own; strip the trailing
    // slash before routing so both forms resolve.
    let router = Router::new().fallback_service(NormalizePath::trim_trailing_slash(router));

    Ok(Application {
        router,
        notifications,
    })
}

fn spawn_notifications<U: UserRepository + 'static>(
    config: &Config,
    users: Arc<U>,
) -> eyre::Result<(JobQueue<ProductEventJob>, NotificationHandle)> {
    let directory = Arc::new(AdminDirectory::new(users));
    let worker_config = WorkerConfig::new("product-events")
        .with_queue_capacity(config.notify.queue_capacity)
        .with_retry_delay(std::time::Duration::from_secs(config.notify.retry_delay_secs))
        .with_max_concurrent_jobs(config.notify.max_concurrent_jobs);
    let (shutdown, shutdown_rx) = watch::channel(false);

    let (queue, worker, mock_provider) = match config.email.backend {
        EmailBackend::Mock => {
            let provider = Arc::new(MockSmtpProvider::new());
            let processor = ProductEventProcessor::new(
                Arc::clone(&provider),
                directory,
                TemplateEngine::new()?,
                &config.email,
            );
            let (queue, worker) = QueueWorker::new(processor, worker_config);
            let handle = tokio::spawn(worker.run(shutdown_rx));
            (queue, handle, Some(provider))
        }
        EmailBackend::Smtp => {
            let smtp = SmtpConfig::from_env()?;
            let provider = Arc::new(SmtpProvider::new(smtp)?);
            let processor = ProductEventProcessor::new(
                provider,
                directory,
                TemplateEngine::new()?,
                &config.email,
            );
            let (queue, worker) = QueueWorker::new(processor, worker_config);
            let handle = tokio::spawn(worker.run(shutdown_rx));
            (queue, handle, None)
        }
    };

    Ok((
        queue,
        NotificationHandle {
            shutdown,
            worker,
            mock_provider,
        },
    ))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
