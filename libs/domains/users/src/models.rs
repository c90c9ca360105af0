use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// User roles. Admin is the only privileged capability; there is no
/// separate superuser flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

/// User entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: Uuid,
    /// Login name (unique)
    pub username: String,
    /// Contact email, receives catalog notifications for admins
    pub email: String,
    /// Argon2 password hash. Persisted as-is; API responses go through
    /// [`UserResponse`], which omits it.
    pub password_hash: String,
    /// Role
    pub role: Role,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user (password must already be hashed)
    pub fn new(username: String, email: String, password_hash: String, role: Role) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            username,
            email,
            password_hash,
            role,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// User response DTO (without password_hash)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// DTO for registering an admin account
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterAdminRequest {
    #[validate(length(min = 3, max = 64))]
    pub username: String,
    #[validate(email, length(max = 255))]
    pub email: String,
    pub password: String,
    /// Must match the registration key configured at startup
    pub registration_key: String,
}

/// DTO for user login
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 64))]
    pub username: String,
    pub password: String,
}

/// Response after successful login: an opaque bearer token plus the
/// authenticated user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("USER".parse::<Role>().unwrap(), Role::User);
        assert!("superuser".parse::<Role>().is_err());
        assert_eq!(Role::Admin.to_string(), "admin");
    }

    #[test]
    fn test_response_omits_password_hash() {
        let user = User::new(
            "alice".to_string(),
            "alice@example.com".to_string(),
            "secret-hash".to_string(),
            Role::Admin,
        );
        let json = serde_json::to_string(&UserResponse::from(user)).unwrap();
        assert!(!json.contains("secret-hash"));
    }

    #[test]
    fn test_is_admin() {
        let admin = User::new(
            "a".to_string(),
            "a@example.com".to_string(),
            "h".to_string(),
            Role::Admin,
        );
        let user = User::new(
            "b".to_string(),
            "b@example.com".to_string(),
            "h".to_string(),
            Role::User,
        );
        assert!(admin.is_admin());
        assert!(!user.is_admin());
    }
}
