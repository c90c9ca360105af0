//! Request identity resolution.
//!
//! The identity provider is deliberately small: an in-memory session
//! store maps opaque bearer tokens to `(user_id, username, roles)`.
//! The middleware resolves the token on every request and inserts an
//! [`Identity`] into the request extensions; handlers read it through
//! the [`CurrentUser`] extractor. Anonymous requests get an anonymous
//! identity rather than a rejection, since read endpoints are open.

pub mod identity;
pub mod middleware;
pub mod session;

pub use identity::{CurrentUser, Identity};
pub use middleware::identity_middleware;
pub use session::SessionStore;

/// Role string carried by admin identities and sessions
pub const ADMIN_ROLE: &str = "admin";
