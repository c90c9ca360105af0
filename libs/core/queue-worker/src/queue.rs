//! Producer-side handle for enqueueing jobs.

use tokio::sync::mpsc;
use tracing::debug;

use crate::error::QueueError;
use crate::job::QueueJob;

/// Cheap-to-clone producer handle for a worker's job channel.
pub struct JobQueue<J: QueueJob> {
    sender: mpsc::Sender<J>,
}

impl<J: QueueJob> Clone for JobQueue<J> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<J: QueueJob> JobQueue<J> {
    pub(crate) fn new(sender: mpsc::Sender<J>) -> Self {
        Self { sender }
    }

    /// Wrap an existing channel sender. Useful in tests that want to
    /// observe enqueued jobs without running a worker.
    pub fn from_sender(sender: mpsc::Sender<J>) -> Self {
        Self { sender }
    }

    /// Enqueue a job, waiting for channel capacity if necessary.
    ///
    /// # Errors
    /// Returns [`QueueError::Closed`] if the worker has stopped.
    pub async fn enqueue(&self, job: J) -> Result<(), QueueError> {
        let job_id = job.job_id();
        self.sender
            .send(job)
            .await
            .map_err(|_| QueueError::Closed)?;
        debug!(job_id = %job_id, "Job enqueued");
        Ok(())
    }
}
