//! # Axum Helpers
//!
//! Shared utilities for the catalog's Axum services.
//!
//! ## Modules
//!
//! - **[`errors`]**: structured error responses with error codes
//! - **[`extractors`]**: custom extractors (UUID path, validated JSON)
//! - **[`auth`]**: request identity resolution backed by an in-memory
//!   session store
//! - **[`server`]**: server bootstrap and graceful shutdown

pub mod auth;
pub mod errors;
pub mod extractors;
pub mod server;

pub use auth::{identity_middleware, CurrentUser, Identity, SessionStore};
pub use errors::{AppError, ErrorCode, ErrorResponse};
pub use extractors::{UuidPath, ValidatedJson};
pub use server::{create_app, shutdown_signal};
