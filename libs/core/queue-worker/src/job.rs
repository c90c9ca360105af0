//! The [`QueueJob`] trait implemented by job payloads.

use serde::{de::DeserializeOwned, Serialize};

/// Trait for queued job payloads.
///
/// Domain models that represent background jobs implement this trait.
/// It provides the methods the worker needs to track and retry jobs.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Clone, Serialize, Deserialize)]
/// struct EmailJob {
///     id: Uuid,
///     to_email: String,
///     retry_count: u32,
/// }
///
/// impl QueueJob for EmailJob {
///     fn job_id(&self) -> String {
///         self.id.to_string()
///     }
///
///     fn retry_count(&self) -> u32 {
///         self.retry_count
///     }
///
///     fn with_retry(&self) -> Self {
///         Self {
///             retry_count: self.retry_count + 1,
///             ..self.clone()
///         }
///     }
/// }
/// ```
pub trait QueueJob: Serialize + DeserializeOwned + Send + Sync + Clone + 'static {
    /// Returns the job ID for logging and tracking.
    fn job_id(&self) -> String;

    /// Returns the current retry count.
    fn retry_count(&self) -> u32;

    /// Creates a new job with an incremented retry count.
    fn with_retry(&self) -> Self;

    /// Maximum retries allowed before the job is dropped.
    /// Default: 3 retries.
    fn max_retries(&self) -> u32 {
        3
    }
}
