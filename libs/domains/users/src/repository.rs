use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{Role, User};

/// Repository trait for User persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a new user
    async fn create(&self, user: User) -> UserResult<User>;

    /// Get a user by ID
    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>>;

    /// Get a user by username
    async fn get_by_username(&self, username: &str) -> UserResult<Option<User>>;

    /// List all users with the given role, newest first
    async fn list_by_role(&self, role: Role) -> UserResult<Vec<User>>;

    /// Check if a username already exists
    async fn username_exists(&self, username: &str) -> UserResult<bool>;
}

/// In-memory implementation of UserRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> UserResult<User> {
        let mut users = self.users.write().await;

        let username_exists = users
            .values()
            .any(|u| u.username.to_lowercase() == user.username.to_lowercase());

        if username_exists {
            return Err(UserError::DuplicateUsername(user.username));
        }

        users.insert(user.id, user.clone());

        tracing::info!(user_id = %user.id, username = %user.username, "Created user");
        Ok(user)
    }

    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn get_by_username(&self, username: &str) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        let user = users
            .values()
            .find(|u| u.username.to_lowercase() == username.to_lowercase())
            .cloned();
        Ok(user)
    }

    async fn list_by_role(&self, role: Role) -> UserResult<Vec<User>> {
        let users = self.users.read().await;

        let mut result: Vec<User> = users.values().filter(|u| u.role == role).cloned().collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }

    async fn username_exists(&self, username: &str) -> UserResult<bool> {
        let users = self.users.read().await;
        let exists = users
            .values()
            .any(|u| u.username.to_lowercase() == username.to_lowercase());
        Ok(exists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(username: &str, role: Role) -> User {
        User::new(
            username.to_string(),
            format!("{username}@example.com"),
            "hashed_password".to_string(),
            role,
        )
    }

    #[tokio::test]
    async fn test_create_and_get_user() {
        let repo = InMemoryUserRepository::new();

        let created = repo.create(user("alice", Role::Admin)).await.unwrap();
        assert_eq!(created.username, "alice");

        let fetched = repo.get_by_id(created.id).await.unwrap();
        assert_eq!(fetched.unwrap().id, created.id);
    }

    #[tokio::test]
    async fn test_get_by_username_is_case_insensitive() {
        let repo = InMemoryUserRepository::new();
        repo.create(user("alice", Role::Admin)).await.unwrap();

        assert!(repo.get_by_username("alice").await.unwrap().is_some());
        assert!(repo.get_by_username("ALICE").await.unwrap().is_some());
        assert!(repo.get_by_username("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_error() {
        let repo = InMemoryUserRepository::new();
        repo.create(user("alice", Role::Admin)).await.unwrap();

        let result = repo.create(user("Alice", Role::User)).await;
        assert!(matches!(result, Err(UserError::DuplicateUsername(_))));
    }

    #[tokio::test]
    async fn test_list_by_role_filters_and_sorts() {
        let repo = InMemoryUserRepository::new();
        repo.create(user("admin1", Role::Admin)).await.unwrap();
        repo.create(user("viewer", Role::User)).await.unwrap();
        repo.create(user("admin2", Role::Admin)).await.unwrap();

        let admins = repo.list_by_role(Role::Admin).await.unwrap();
        assert_eq!(admins.len(), 2);
        assert!(admins.iter().all(|u| u.is_admin()));
    }
}
