use crate::{env_or_default, env_required, ConfigError, FromEnv};

/// MongoDB configuration
#[derive(Clone, Debug)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
}

impl MongoConfig {
    pub fn new(uri: String, database: String) -> Self {
        Self { uri, database }
    }

    /// Load the config only if MONGO_URI is set; `None` selects the
    /// in-memory backend.
    pub fn from_env_optional() -> Result<Option<Self>, ConfigError> {
        if std::env::var("MONGO_URI").is_err() {
            return Ok(None);
        }
        Self::from_env().map(Some)
    }
}

impl FromEnv for MongoConfig {
    /// Requires MONGO_URI to be set (no default); MONGO_DATABASE defaults
    /// to "catalog".
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            uri: env_required("MONGO_URI")?,
            database: env_or_default("MONGO_DATABASE", "catalog"),
        })
    }
}
