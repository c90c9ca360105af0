//! Field-level change detection for update notifications.
//!
//! Only the significant fields (price, name, brand, sku) participate.
//! Counter bumps and timestamp refreshes never produce a change, so
//! read traffic can never trigger a notification.

use std::collections::BTreeMap;

use email::FieldChange;

use crate::models::Product;

/// Fields compared by [`detect_changes`]
pub const TRACKED_FIELDS: [&str; 4] = ["price", "name", "brand", "sku"];

/// Compare two product states and return the tracked fields that
/// differ, with display-formatted old/new values. An empty map means
/// the update is not notification-worthy.
pub fn detect_changes(old: &Product, new: &Product) -> BTreeMap<String, FieldChange> {
    let mut changes = BTreeMap::new();

    if old.price_cents != new.price_cents {
        changes.insert(
            "price".to_string(),
            FieldChange {
                old: old.price_display(),
                new: new.price_display(),
            },
        );
    }

    if old.name != new.name {
        changes.insert(
            "name".to_string(),
            FieldChange {
                old: old.name.clone(),
                new: new.name.clone(),
            },
        );
    }

    if old.brand != new.brand {
        changes.insert(
            "brand".to_string(),
            FieldChange {
                old: old.brand.clone(),
                new: new.brand.clone(),
            },
        );
    }

    if old.sku != new.sku {
        changes.insert(
            "sku".to_string(),
            FieldChange {
                old: old.sku.clone(),
                new: new.sku.clone(),
            },
        );
    }

    changes
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::models::CreateProduct;

    fn product() -> Product {
        Product::new(
            CreateProduct {
                sku: "WID-001".to_string(),
                name: "Widget".to_string(),
                brand: "Acme".to_string(),
                price_cents: 1999,
            },
            None,
        )
    }

    #[test]
    fn identical_products_produce_no_changes() {
        let p = product();
        assert!(detect_changes(&p, &p.clone()).is_empty());
    }

    #[test]
    fn counter_and_timestamp_drift_is_not_a_change() {
        let old = product();
        let mut new = old.clone();
        new.view_count = 42;
        new.list_view_count = 7;
        new.last_viewed = Some(Utc::now());
        new.updated_at = Utc::now();

        assert!(detect_changes(&old, &new).is_empty());
    }

    #[test]
    fn price_change_is_exactly_one_entry() {
        let old = product();
        let mut new = old.clone();
        new.price_cents = 2499;
        new.display_price = Some(24.99);

        let changes = detect_changes(&old, &new);
        assert_eq!(changes.len(), 1);
        let change = &changes["price"];
        assert_eq!(change.old, "19.99");
        assert_eq!(change.new, "24.99");
    }

    #[test]
    fn multiple_tracked_fields_are_all_reported() {
        let old = product();
        let mut new = old.clone();
        new.name = "Widget Pro".to_string();
        new.brand = "Acme Labs".to_string();
        new.price_cents = 2999;

        let changes = detect_changes(&old, &new);
        assert_eq!(changes.len(), 3);
        assert!(changes.contains_key("name"));
        assert!(changes.contains_key("brand"));
        assert!(changes.contains_key("price"));
        assert!(!changes.contains_key("sku"));
    }
}
