//! Application configuration assembled from the environment.

use core_config::auth::AuthConfig;
use core_config::email::EmailConfig;
use core_config::mongodb::MongoConfig;
use core_config::notify::NotifyConfig;
use core_config::server::ServerConfig;
use core_config::{ConfigError, Environment, FromEnv};

/// Full configuration for the catalog API process.
#[derive(Clone, Debug)]
pub struct Config {
    pub environment: Environment,
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub email: EmailConfig,
    pub notify: NotifyConfig,
    /// `None` selects the in-memory storage backend.
    pub mongodb: Option<MongoConfig>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            environment: Environment::from_env(),
            server: ServerConfig::from_env()?,
            auth: AuthConfig::from_env()?,
            email: EmailConfig::from_env()?,
            notify: NotifyConfig::from_env()?,
            mongodb: MongoConfig::from_env_optional()?,
        })
    }
}
