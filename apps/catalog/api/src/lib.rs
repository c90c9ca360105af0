//! Catalog API
//!
//! Binary crate wiring: configuration, storage backend selection,
//! session store, identity middleware, notification worker and the
//! HTTP router. End-to-end tests build the same stack in-memory via
//! [`app::build`].

pub mod app;
pub mod config;

pub use app::{build, run, Application, NotificationHandle};
pub use config::Config;
