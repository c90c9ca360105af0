use crate::{env_or_default, ConfigError, FromEnv};

/// Notification queue/worker configuration
#[derive(Clone, Debug)]
pub struct NotifyConfig {
    /// Bounded queue capacity between the API and the worker
    pub queue_capacity: usize,
    /// Fixed delay between job retries, in seconds
    pub retry_delay_secs: u64,
    /// Maximum jobs processed concurrently by the worker
    pub max_concurrent_jobs: usize,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 1024,
            retry_delay_secs: 60,
            max_concurrent_jobs: 4,
        }
    }
}

impl FromEnv for NotifyConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let parse = |key: &str, default: &str| -> Result<u64, ConfigError> {
            env_or_default(key, default)
                .parse()
                .map_err(|e| ConfigError::ParseError {
                    key: key.to_string(),
                    details: format!("{}", e),
                })
        };

        Ok(Self {
            queue_capacity: parse("NOTIFY_QUEUE_CAPACITY", "1024")? as usize,
            retry_delay_secs: parse("NOTIFY_RETRY_DELAY_SECS", "60")?,
            max_concurrent_jobs: parse("NOTIFY_MAX_CONCURRENT_JOBS", "4")? as usize,
        })
    }
}
