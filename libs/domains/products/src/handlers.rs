//! HTTP handlers for the Products API
//!
//! Reads are open; anonymous reads feed the view counters. Mutations
//! require an admin identity and publish notification jobs through
//! the service.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use axum_helpers::{AppError, CurrentUser, Identity, UuidPath, ValidatedJson};
use serde::Deserialize;
use std::sync::Arc;

use crate::analytics::{AnalyticsRange, CatalogStats, ViewAnalytics};
use crate::models::{Actor, CreateProduct, Product, ProductFilter, UpdateProduct};
use crate::repository::ProductRepository;
use crate::service::ProductService;

/// Create the products router with all HTTP endpoints
pub fn router<R: ProductRepository + 'static>(service: ProductService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/stats", get(stats))
        .route("/view_analytics", get(view_analytics))
        .route(
            "/{id}",
            get(get_product)
                .put(update_product)
                .patch(update_product)
                .delete(delete_product),
        )
        .with_state(shared_service)
}

fn require_actor(identity: &Identity) -> Result<Actor, AppError> {
    let id = identity.require_admin()?;
    Ok(Actor {
        id,
        username: identity.username.clone().unwrap_or_default(),
    })
}

/// List products with optional filters
async fn list_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    CurrentUser(identity): CurrentUser,
    Query(filter): Query<ProductFilter>,
) -> Result<Json<Vec<Product>>, AppError> {
    // Only anonymous traffic counts as a catalog view; bump first so
    // the response already reflects the new counters
    if !identity.is_authenticated() {
        service.record_list_view().await;
    }

    let products = service.list_products(&filter).await?;
    Ok(Json(products))
}

/// Create a new product (admin only)
async fn create_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    CurrentUser(identity): CurrentUser,
    ValidatedJson(input): ValidatedJson<CreateProduct>,
) -> Result<impl IntoResponse, AppError> {
    let actor = require_actor(&identity)?;
    let product = service.create_product(input, &actor).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Get a product by ID
async fn get_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    CurrentUser(identity): CurrentUser,
    UuidPath(id): UuidPath,
) -> Result<Json<Product>, AppError> {
    // Bump before the read so the returned product carries the view
    // that this request caused. A miss is swallowed and the fetch
    // below still yields the 404.
    if !identity.is_authenticated() {
        service.record_product_view(id).await;
    }

    let product = service.get_product(id).await?;
    Ok(Json(product))
}

/// Update a product (admin only)
async fn update_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    CurrentUser(identity): CurrentUser,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateProduct>,
) -> Result<Json<Product>, AppError> {
    let actor = require_actor(&identity)?;
    let product = service.update_product(id, input, &actor).await?;
    Ok(Json(product))
}

/// Delete a product (admin only)
async fn delete_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    CurrentUser(identity): CurrentUser,
    UuidPath(id): UuidPath,
) -> Result<StatusCode, AppError> {
    let actor = require_actor(&identity)?;
    service.delete_product(id, &actor).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Aggregate catalog stats
async fn stats<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
) -> Result<Json<CatalogStats>, AppError> {
    let stats = service.stats().await?;
    Ok(Json(stats))
}

#[derive(Debug, Deserialize)]
struct AnalyticsQuery {
    range: Option<String>,
}

/// Windowed view analytics
async fn view_analytics<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<ViewAnalytics>, AppError> {
    let range = query
        .range
        .as_deref()
        .map(AnalyticsRange::parse_or_default)
        .unwrap_or_default();
    let analytics = service.view_analytics(range).await?;
    Ok(Json(analytics))
}
