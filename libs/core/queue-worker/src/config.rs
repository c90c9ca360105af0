//! Worker configuration.

use std::time::Duration;

/// Configuration for a [`QueueWorker`](crate::QueueWorker).
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Worker name, used in logs
    pub name: String,
    /// Capacity of the bounded job channel
    pub queue_capacity: usize,
    /// Fixed delay before a transiently failed job is re-enqueued
    pub retry_delay: Duration,
    /// Maximum number of jobs processed concurrently
    pub max_concurrent_jobs: usize,
}

impl WorkerConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            queue_capacity: 1024,
            retry_delay: Duration::from_secs(60),
            max_concurrent_jobs: 1,
        }
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity.max(1);
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn with_max_concurrent_jobs(mut self, max: usize) -> Self {
        self.max_concurrent_jobs = max.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_clamps_to_sane_minimums() {
        let config = WorkerConfig::new("test")
            .with_queue_capacity(0)
            .with_max_concurrent_jobs(0);
        assert_eq!(config.queue_capacity, 1);
        assert_eq!(config.max_concurrent_jobs, 1);
    }
}
