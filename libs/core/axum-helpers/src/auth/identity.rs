use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::errors::AppError;

use super::ADMIN_ROLE;

/// Resolved caller identity, inserted into request extensions by
/// [`identity_middleware`](super::identity_middleware)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Option<Uuid>,
    pub username: Option<String>,
    pub roles: Vec<String>,
}

impl Identity {
    pub fn anonymous() -> Self {
        Self {
            user_id: None,
            username: None,
            roles: Vec::new(),
        }
    }

    pub fn authenticated(user_id: Uuid, username: String, roles: Vec<String>) -> Self {
        Self {
            user_id: Some(user_id),
            username: Some(username),
            roles,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(|r| r == ADMIN_ROLE)
    }

    /// Returns the acting admin's id, or the appropriate auth error:
    /// `401` for anonymous callers, `403` for authenticated non-admins.
    pub fn require_admin(&self) -> Result<Uuid, AppError> {
        match self.user_id {
            None => Err(AppError::Unauthorized(
                "Authentication required".to_string(),
            )),
            Some(user_id) if self.is_admin() => Ok(user_id),
            Some(_) => Err(AppError::Forbidden(
                "Admin privileges required".to_string(),
            )),
        }
    }
}

/// Extractor yielding the caller's [`Identity`]. Falls back to an
/// anonymous identity when the middleware is not installed, so open
/// routes never reject.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Identity);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let identity = parts
            .extensions
            .get::<Identity>()
            .cloned()
            .unwrap_or_else(Identity::anonymous);
        Ok(CurrentUser(identity))
    }
}
