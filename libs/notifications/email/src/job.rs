//! Product event job payloads.
//!
//! A job carries a detached snapshot of the product taken at mutation
//! time, so later edits or a delete never change what the notification
//! reports. The admin audience is deliberately NOT captured here: it is
//! resolved when the job is processed, so retries see the current set
//! of admins.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use queue_worker::QueueJob;

/// What happened to the product
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProductEventKind {
    Created,
    Updated,
    Deleted,
}

impl ProductEventKind {
    /// Template name for this event kind
    pub fn template_name(&self) -> &'static str {
        match self {
            ProductEventKind::Created => "product_created",
            ProductEventKind::Updated => "product_updated",
            ProductEventKind::Deleted => "product_deleted",
        }
    }
}

/// One tracked field's before/after values, already formatted for
/// display
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldChange {
    pub old: String,
    pub new: String,
}

/// Point-in-time copy of the product fields the notification reports
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSnapshot {
    pub id: Uuid,
    pub name: String,
    pub brand: String,
    pub sku: String,
    pub price_cents: i64,
    pub updated_at: DateTime<Utc>,
}

/// Background job describing a product mutation to announce
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductEventJob {
    pub id: Uuid,
    pub kind: ProductEventKind,
    pub product: ProductSnapshot,
    /// Tracked field changes, keyed by field name. Empty for created
    /// and deleted events.
    #[serde(default)]
    pub changes: BTreeMap<String, FieldChange>,
    /// Admin who performed the mutation; excluded from the audience
    pub actor_user_id: Option<Uuid>,
    pub actor_username: Option<String>,
    #[serde(default)]
    pub retry_count: u32,
    pub created_at: DateTime<Utc>,
}

impl ProductEventJob {
    pub fn new(kind: ProductEventKind, product: ProductSnapshot) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            product,
            changes: BTreeMap::new(),
            actor_user_id: None,
            actor_username: None,
            retry_count: 0,
            created_at: Utc::now(),
        }
    }

    pub fn with_changes(mut self, changes: BTreeMap<String, FieldChange>) -> Self {
        self.changes = changes;
        self
    }

    pub fn with_actor(mut self, user_id: Uuid, username: impl Into<String>) -> Self {
        self.actor_user_id = Some(user_id);
        self.actor_username = Some(username.into());
        self
    }
}

impl QueueJob for ProductEventJob {
    fn job_id(&self) -> String {
        self.id.to_string()
    }

    fn retry_count(&self) -> u32 {
        self.retry_count
    }

    fn with_retry(&self) -> Self {
        Self {
            retry_count: self.retry_count + 1,
            ..self.clone()
        }
    }

    fn max_retries(&self) -> u32 {
        3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> ProductSnapshot {
        ProductSnapshot {
            id: Uuid::new_v4(),
            name: "Widget".to_string(),
            brand: "Acme".to_string(),
            sku: "WID-001".to_string(),
            price_cents: 1999,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_with_retry_increments_count() {
        let job = ProductEventJob::new(ProductEventKind::Created, snapshot());
        assert_eq!(job.retry_count(), 0);

        let retried = job.with_retry();
        assert_eq!(retried.retry_count(), 1);
        assert_eq!(retried.id, job.id);
    }

    #[test]
    fn test_job_roundtrips_through_json() {
        let mut changes = BTreeMap::new();
        changes.insert(
            "price".to_string(),
            FieldChange {
                old: "19.99".to_string(),
                new: "24.99".to_string(),
            },
        );
        let job = ProductEventJob::new(ProductEventKind::Updated, snapshot())
            .with_changes(changes)
            .with_actor(Uuid::new_v4(), "admin");

        let json = serde_json::to_string(&job).unwrap();
        let parsed: ProductEventJob = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.kind, ProductEventKind::Updated);
        assert_eq!(parsed.changes["price"].new, "24.99");
        assert_eq!(parsed.actor_username.as_deref(), Some("admin"));
    }
}
