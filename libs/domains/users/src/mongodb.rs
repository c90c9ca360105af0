//! MongoDB implementation of UserRepository

use async_trait::async_trait;
use mongodb::{
    bson::{doc, to_bson, Bson},
    options::IndexOptions,
    Collection, Database, IndexModel,
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{Role, User};
use crate::repository::UserRepository;

/// MongoDB implementation of the UserRepository
pub struct MongoUserRepository {
    collection: Collection<User>,
}

impl MongoUserRepository {
    /// Create a new MongoUserRepository
    pub fn new(db: &Database) -> Self {
        let collection = db.collection::<User>("users");
        Self { collection }
    }

    /// Initialize indexes
    pub async fn init_indexes(&self) -> UserResult<()> {
        let indexes = vec![
            // Unique username index (case-folded value stored lowercase)
            IndexModel::builder()
                .keys(doc! { "username": 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name("idx_username_unique".to_string())
                        .build(),
                )
                .build(),
            // Role listing
            IndexModel::builder()
                .keys(doc! { "role": 1, "created_at": -1 })
                .options(IndexOptions::builder().name("idx_role".to_string()).build())
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("User indexes created successfully");
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    #[instrument(skip(self, user), fields(username = %user.username))]
    async fn create(&self, user: User) -> UserResult<User> {
        if self.username_exists(&user.username).await? {
            return Err(UserError::DuplicateUsername(user.username));
        }

        self.collection.insert_one(&user).await?;

        tracing::info!(user_id = %user.id, "User created successfully");
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        let filter = doc! { "id": to_bson(&id).unwrap_or(Bson::Null) };
        let user = self.collection.find_one(filter).await?;
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn get_by_username(&self, username: &str) -> UserResult<Option<User>> {
        let filter = doc! { "username": { "$regex": format!("^{}$", regex_escape(username)), "$options": "i" } };
        let user = self.collection.find_one(filter).await?;
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn list_by_role(&self, role: Role) -> UserResult<Vec<User>> {
        use futures_util::TryStreamExt;

        let filter = doc! { "role": role.to_string() };
        let options = mongodb::options::FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .build();

        let cursor = self.collection.find(filter).with_options(options).await?;
        let users: Vec<User> = cursor.try_collect().await?;
        Ok(users)
    }

    #[instrument(skip(self))]
    async fn username_exists(&self, username: &str) -> UserResult<bool> {
        Ok(self.get_by_username(username).await?.is_some())
    }
}

/// Escape regex metacharacters so usernames are matched literally
fn regex_escape(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if r".^$*+?()[]{}|\".contains(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regex_escape() {
        assert_eq!(regex_escape("alice"), "alice");
        assert_eq!(regex_escape("a.b"), r"a\.b");
        assert_eq!(regex_escape("a+b?"), r"a\+b\?");
    }
}
