//! The [`JobProcessor`] trait implemented by job handlers.

use async_trait::async_trait;

use crate::error::QueueError;
use crate::job::QueueJob;

/// Trait for job processors.
///
/// Domain handlers implement this trait to process jobs from the queue.
///
/// # Example
///
/// ```rust,ignore
/// struct EmailProcessor {
///     provider: Arc<dyn EmailProvider>,
/// }
///
/// #[async_trait]
/// impl JobProcessor<EmailJob> for EmailProcessor {
///     async fn process(&self, job: &EmailJob) -> Result<(), QueueError> {
///         self.provider
///             .send(&job.to_email)
///             .await
///             .map_err(|e| QueueError::transient(e.to_string()))
///     }
///
///     fn name(&self) -> &'static str {
///         "EmailProcessor"
///     }
/// }
/// ```
#[async_trait]
pub trait JobProcessor<J: QueueJob>: Send + Sync {
    /// Process a single job.
    ///
    /// Return `Ok(())` for success. Transient errors are retried up to
    /// the job's `max_retries`; permanent errors drop the job.
    async fn process(&self, job: &J) -> Result<(), QueueError>;

    /// Get the processor name for logging.
    fn name(&self) -> &'static str;
}
