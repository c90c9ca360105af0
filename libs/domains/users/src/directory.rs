//! Admin audience resolution backed by the user repository.

use std::sync::Arc;

use async_trait::async_trait;
use email::{Recipient, RecipientDirectory};
use eyre::Result;

use crate::models::Role;
use crate::repository::UserRepository;

/// Resolves notification recipients from the live admin set.
pub struct AdminDirectory<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> AdminDirectory<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R: UserRepository> RecipientDirectory for AdminDirectory<R> {
    async fn admin_recipients(&self) -> Result<Vec<Recipient>> {
        let admins = self
            .repository
            .list_by_role(Role::Admin)
            .await
            .map_err(|e| eyre::eyre!("Failed to list admins: {e}"))?;

        Ok(admins
            .into_iter()
            .map(|u| Recipient {
                user_id: u.id,
                username: u.username,
                email: u.email,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;
    use crate::repository::InMemoryUserRepository;

    #[tokio::test]
    async fn resolves_only_admins() {
        let repo = Arc::new(InMemoryUserRepository::new());
        repo.create(User::new(
            "alice".to_string(),
            "alice@example.com".to_string(),
            "h".to_string(),
            Role::Admin,
        ))
        .await
        .unwrap();
        repo.create(User::new(
            "viewer".to_string(),
            "viewer@example.com".to_string(),
            "h".to_string(),
            Role::User,
        ))
        .await
        .unwrap();

        let directory = AdminDirectory::new(repo);
        let recipients = directory.admin_recipients().await.unwrap();
        assert_eq!(recipients.len(), 1);
        assert_eq!(recipients[0].email, "alice@example.com");
    }
}
