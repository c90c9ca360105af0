use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Product entity
///
/// The SKU is the immutable business identity; it is set at creation
/// and never updated. Counters only move through the repository's
/// atomic increment operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier (stored as _id in MongoDB)
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    /// Stock Keeping Unit (unique, immutable)
    pub sku: String,
    /// Product name
    pub name: String,
    /// Brand name
    pub brand: String,
    /// Price in cents (for precision)
    pub price_cents: i64,
    /// Display price (computed from price_cents)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_price: Option<f64>,
    /// Per-product detail view counter
    #[serde(default)]
    pub view_count: i64,
    /// Catalog list view counter
    #[serde(default)]
    pub list_view_count: i64,
    /// When the product detail was last viewed
    pub last_viewed: Option<DateTime<Utc>>,
    /// Admin who created the product
    pub created_by: Option<Uuid>,
    /// Admin who performed the most recent update
    pub last_updated_by: Option<Uuid>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp (refreshed on every mutation)
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating a new product
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProduct {
    #[validate(length(min = 1, max = 50))]
    pub sku: String,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub brand: String,
    /// Price in cents
    #[validate(range(min = 0))]
    pub price_cents: i64,
}

/// DTO for updating an existing product (SKU is not updatable)
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProduct {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub brand: Option<String>,
    #[validate(range(min = 0))]
    pub price_cents: Option<i64>,
}

/// Query filters for listing products
#[derive(Debug, Clone, Deserialize)]
pub struct ProductFilter {
    /// Filter by brand (exact match)
    pub brand: Option<String>,
    /// Search in name and SKU
    pub search: Option<String>,
    /// Maximum number of results
    #[serde(default = "default_limit")]
    pub limit: i64,
    /// Number of results to skip
    #[serde(default)]
    pub offset: u64,
}

impl Default for ProductFilter {
    fn default() -> Self {
        Self {
            brand: None,
            search: None,
            limit: default_limit(),
            offset: 0,
        }
    }
}

fn default_limit() -> i64 {
    50
}

/// Hard cap on page size, whatever the query string asks for
const MAX_LIMIT: i64 = 500;

impl ProductFilter {
    /// Requested limit clamped to `0..=500`. Negative values from the
    /// query string yield an empty page instead of an unbounded scan.
    pub fn effective_limit(&self) -> i64 {
        self.limit.clamp(0, MAX_LIMIT)
    }
}

/// Authenticated admin performing a mutation
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: Uuid,
    pub username: String,
}

impl Product {
    /// Create a new product from CreateProduct DTO
    pub fn new(input: CreateProduct, created_by: Option<Uuid>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            sku: input.sku,
            name: input.name,
            brand: input.brand,
            price_cents: input.price_cents,
            display_price: Some(input.price_cents as f64 / 100.0),
            view_count: 0,
            list_view_count: 0,
            last_viewed: None,
            created_by,
            last_updated_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply updates from UpdateProduct DTO
    pub fn apply_update(&mut self, update: UpdateProduct, updated_by: Option<Uuid>) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(brand) = update.brand {
            self.brand = brand;
        }
        if let Some(price_cents) = update.price_cents {
            self.price_cents = price_cents;
            self.display_price = Some(price_cents as f64 / 100.0);
        }
        self.last_updated_by = updated_by;
        self.updated_at = Utc::now();
    }

    /// Price formatted with two decimal places, e.g. `19.99`
    pub fn price_display(&self) -> String {
        format!(
            "{}.{:02}",
            self.price_cents / 100,
            (self.price_cents % 100).abs()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_input() -> CreateProduct {
        CreateProduct {
            sku: "WID-001".to_string(),
            name: "Widget".to_string(),
            brand: "Acme".to_string(),
            price_cents: 1999,
        }
    }

    #[test]
    fn test_new_product_has_zero_counters() {
        let product = Product::new(create_input(), Some(Uuid::new_v4()));
        assert_eq!(product.view_count, 0);
        assert_eq!(product.list_view_count, 0);
        assert!(product.last_viewed.is_none());
        assert_eq!(product.display_price, Some(19.99));
    }

    #[test]
    fn test_apply_update_refreshes_timestamp_and_actor() {
        let mut product = Product::new(create_input(), None);
        let before = product.updated_at;
        let admin = Uuid::new_v4();

        product.apply_update(
            UpdateProduct {
                price_cents: Some(2499),
                ..Default::default()
            },
            Some(admin),
        );

        assert_eq!(product.price_cents, 2499);
        assert_eq!(product.display_price, Some(24.99));
        assert_eq!(product.last_updated_by, Some(admin));
        assert!(product.updated_at >= before);
        // SKU untouched by updates
        assert_eq!(product.sku, "WID-001");
    }

    #[test]
    fn test_price_display() {
        let mut product = Product::new(create_input(), None);
        assert_eq!(product.price_display(), "19.99");
        product.price_cents = 500;
        assert_eq!(product.price_display(), "5.00");
        product.price_cents = 7;
        assert_eq!(product.price_display(), "0.07");
    }

    #[test]
    fn test_filter_limit_is_clamped() {
        let mut filter = ProductFilter::default();
        assert_eq!(filter.effective_limit(), 50);

        filter.limit = -5;
        assert_eq!(filter.effective_limit(), 0);

        filter.limit = 10_000;
        assert_eq!(filter.effective_limit(), 500);
    }

    #[test]
    fn test_validation_bounds() {
        use validator::Validate;

        let mut input = create_input();
        input.sku = String::new();
        assert!(input.validate().is_err());

        let update = UpdateProduct {
            price_cents: Some(-1),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }
}
