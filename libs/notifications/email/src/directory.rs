//! Audience resolution for admin notifications.
//!
//! The directory is queried at processing time rather than at enqueue
//! time, so a retried job always addresses the current admin set.

use async_trait::async_trait;
use eyre::Result;
use uuid::Uuid;

/// One notification recipient
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
}

/// Source of admin recipients for catalog notifications
#[async_trait]
pub trait RecipientDirectory: Send + Sync {
    /// All admins that should receive catalog notifications.
    async fn admin_recipients(&self) -> Result<Vec<Recipient>>;
}

/// Fixed recipient list, used in tests and single-tenant setups
pub struct StaticRecipientDirectory {
    recipients: Vec<Recipient>,
}

impl StaticRecipientDirectory {
    pub fn new(recipients: Vec<Recipient>) -> Self {
        Self { recipients }
    }

    pub fn empty() -> Self {
        Self {
            recipients: Vec::new(),
        }
    }
}

#[async_trait]
impl RecipientDirectory for StaticRecipientDirectory {
    async fn admin_recipients(&self) -> Result<Vec<Recipient>> {
        Ok(self.recipients.clone())
    }
}
