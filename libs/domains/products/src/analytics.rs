//! Windowed view analytics and catalog stats.
//!
//! Pure aggregation over product counters; no side effects. The
//! window length in days is clamped to at least 1 so the trending
//! rate never divides by zero.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

use crate::models::Product;

/// Analytics time window
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, Default,
)]
pub enum AnalyticsRange {
    #[serde(rename = "24h")]
    #[strum(serialize = "24h")]
    Day,
    #[default]
    #[serde(rename = "7d")]
    #[strum(serialize = "7d")]
    Week,
    #[serde(rename = "30d")]
    #[strum(serialize = "30d")]
    Month,
}

impl AnalyticsRange {
    /// Parse a query value, falling back to the 7d default on unknown
    /// input.
    pub fn parse_or_default(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }

    pub fn duration(&self) -> Duration {
        match self {
            AnalyticsRange::Day => Duration::hours(24),
            AnalyticsRange::Week => Duration::days(7),
            AnalyticsRange::Month => Duration::days(30),
        }
    }

    /// Window length in whole days, clamped to at least 1.
    pub fn window_days(&self) -> i64 {
        self.duration().num_days().max(1)
    }
}

/// Aggregate catalog counts
#[derive(Debug, Clone, Serialize)]
pub struct CatalogStats {
    pub total_products: usize,
    pub total_views: i64,
    pub total_list_views: i64,
    pub most_viewed: Vec<Product>,
    pub recently_updated: Vec<Product>,
}

/// Windowed view metrics
#[derive(Debug, Clone, Serialize)]
pub struct ViewMetrics {
    pub total_views: i64,
    pub unique_products_viewed: usize,
    pub views_per_product: f64,
}

/// Per-product entry in the windowed view list
#[derive(Debug, Clone, Serialize)]
pub struct ProductViews {
    pub id: Uuid,
    pub sku: String,
    pub name: String,
    pub views: i64,
    pub last_viewed: DateTime<Utc>,
}

/// Trending entry: views normalized by window length
#[derive(Debug, Clone, Serialize)]
pub struct TrendingProduct {
    pub id: Uuid,
    pub sku: String,
    pub name: String,
    pub view_count: i64,
    pub view_increase: i64,
}

/// Windowed analytics report
#[derive(Debug, Clone, Serialize)]
pub struct ViewAnalytics {
    pub period: AnalyticsRange,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub metrics: ViewMetrics,
    pub product_views: Vec<ProductViews>,
    pub trending_products: Vec<TrendingProduct>,
}

/// Aggregate counts over the whole catalog.
pub fn compute_stats(products: &[Product]) -> CatalogStats {
    let total_views = products.iter().map(|p| p.view_count).sum();
    let total_list_views = products.iter().map(|p| p.list_view_count).sum();

    let mut most_viewed: Vec<Product> = products.to_vec();
    most_viewed.sort_by(|a, b| b.view_count.cmp(&a.view_count));
    most_viewed.truncate(5);

    let mut recently_updated: Vec<Product> = products.to_vec();
    recently_updated.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    recently_updated.truncate(5);

    CatalogStats {
        total_products: products.len(),
        total_views,
        total_list_views,
        most_viewed,
        recently_updated,
    }
}

/// Aggregate the window of products viewed since `now - range`.
pub fn compute_view_analytics(
    products: &[Product],
    range: AnalyticsRange,
    now: DateTime<Utc>,
) -> ViewAnalytics {
    let cutoff = now - range.duration();

    let viewed: Vec<&Product> = products
        .iter()
        .filter(|p| p.last_viewed.is_some_and(|at| at >= cutoff))
        .collect();

    let total_views: i64 = viewed.iter().map(|p| p.view_count).sum();
    let unique_products_viewed = viewed.len();
    let views_per_product = if unique_products_viewed == 0 {
        0.0
    } else {
        total_views as f64 / unique_products_viewed as f64
    };

    let mut product_views: Vec<ProductViews> = viewed
        .iter()
        .map(|p| ProductViews {
            id: p.id,
            sku: p.sku.clone(),
            name: p.name.clone(),
            views: p.view_count,
            // filter above guarantees last_viewed is set
            last_viewed: p.last_viewed.unwrap_or(now),
        })
        .collect();
    product_views.sort_by(|a, b| b.views.cmp(&a.views));

    let days = range.window_days();
    let mut trending_products: Vec<TrendingProduct> = viewed
        .iter()
        .map(|p| TrendingProduct {
            id: p.id,
            sku: p.sku.clone(),
            name: p.name.clone(),
            view_count: p.view_count,
            view_increase: p.view_count / days,
        })
        .collect();
    trending_products.sort_by(|a, b| b.view_increase.cmp(&a.view_increase));
    trending_products.truncate(5);

    ViewAnalytics {
        period: range,
        start_date: cutoff,
        end_date: now,
        metrics: ViewMetrics {
            total_views,
            unique_products_viewed,
            views_per_product,
        },
        product_views,
        trending_products,
    }
}
