//! Users Domain
//!
//! Admin accounts for the product catalog: registration behind a
//! configured key, argon2 password verification, opaque-token login,
//! and the admin directory that notification dispatch draws its
//! audience from.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints (/auth/*, /admin/users)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Registration key check, password hashing
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + memory/mongo impls)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← User, Role, DTOs
//! └─────────────┘
//! ```

pub mod directory;
pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use directory::AdminDirectory;
pub use error::{UserError, UserResult};
pub use handlers::AuthState;
pub use models::{LoginRequest, LoginResponse, RegisterAdminRequest, Role, User, UserResponse};
pub use mongodb::MongoUserRepository;
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
