//! User service - registration, credential verification, admin listing

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use core_config::auth::AuthConfig;

use crate::error::{UserError, UserResult};
use crate::models::{RegisterAdminRequest, Role, User, UserResponse};
use crate::repository::UserRepository;

/// Service layer for user business logic
///
/// Holds the admin registration key injected at startup; nothing here
/// reads the environment.
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
    registration_key: String,
}

impl<R: UserRepository> Clone for UserService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            registration_key: self.registration_key.clone(),
        }
    }
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R, auth_config: &AuthConfig) -> Self {
        Self::with_arc_repository(Arc::new(repository), auth_config)
    }

    /// Create a service sharing an already-shared repository
    pub fn with_arc_repository(repository: Arc<R>, auth_config: &AuthConfig) -> Self {
        Self {
            repository,
            registration_key: auth_config.admin_registration_key.clone(),
        }
    }

    /// Register a new admin account, guarded by the registration key
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn register_admin(&self, input: RegisterAdminRequest) -> UserResult<UserResponse> {
        if input.registration_key != self.registration_key {
            return Err(UserError::InvalidRegistrationKey);
        }

        self.validate_password(&input.password)?;

        if self.repository.username_exists(&input.username).await? {
            return Err(UserError::DuplicateUsername(input.username));
        }

        let password_hash = self.hash_password(&input.password)?;
        let user = User::new(input.username, input.email, password_hash, Role::Admin);

        let created = self.repository.create(user).await?;
        Ok(created.into())
    }

    /// Verify username/password credentials (for login)
    #[instrument(skip(self, password))]
    pub async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> UserResult<UserResponse> {
        let user = self
            .repository
            .get_by_username(username)
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        if !self.verify_password(password, &user.password_hash)? {
            return Err(UserError::InvalidCredentials);
        }

        Ok(user.into())
    }

    /// Get a user by ID
    #[instrument(skip(self))]
    pub async fn get_user(&self, id: Uuid) -> UserResult<UserResponse> {
        let user = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))?;

        Ok(user.into())
    }

    /// List all admin users, newest first
    #[instrument(skip(self))]
    pub async fn list_admins(&self) -> UserResult<Vec<UserResponse>> {
        let admins = self.repository.list_by_role(Role::Admin).await?;
        Ok(admins.into_iter().map(|u| u.into()).collect())
    }

    // Password helpers

    fn hash_password(&self, password: &str) -> UserResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| UserError::PasswordHash(e.to_string()))
    }

    fn verify_password(&self, password: &str, hash: &str) -> UserResult<bool> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| UserError::PasswordHash(e.to_string()))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    fn validate_password(&self, password: &str) -> UserResult<()> {
        if password.len() < 8 {
            return Err(UserError::Validation(
                "Password must be at least 8 characters".to_string(),
            ));
        }

        if password.len() > 128 {
            return Err(UserError::Validation(
                "Password cannot exceed 128 characters".to_string(),
            ));
        }

        Ok(())
    }
}
