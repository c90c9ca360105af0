//! The generic worker loop draining a job channel.

use std::sync::Arc;

use tokio::sync::{mpsc, watch, Semaphore};
use tracing::{debug, error, info, warn};

use crate::config::WorkerConfig;
use crate::error::QueueError;
use crate::job::QueueJob;
use crate::processor::JobProcessor;
use crate::queue::JobQueue;

/// Generic worker that drains a bounded job channel and dispatches
/// each job to a processor.
///
/// - Concurrency is bounded by `max_concurrent_jobs`
/// - Transient failures are re-enqueued after `retry_delay`, up to the
///   job's `max_retries`
/// - Permanent failures and exhausted retries drop the job with an
///   error log
/// - On shutdown the worker stops accepting jobs and waits for
///   in-flight jobs to finish; pending retry timers are abandoned
pub struct QueueWorker<J, P>
where
    J: QueueJob,
    P: JobProcessor<J>,
{
    receiver: mpsc::Receiver<J>,
    requeue: mpsc::Sender<J>,
    processor: Arc<P>,
    config: WorkerConfig,
    semaphore: Arc<Semaphore>,
}

impl<J, P> QueueWorker<J, P>
where
    J: QueueJob,
    P: JobProcessor<J> + 'static,
{
    /// Create a worker and the producer handle feeding it.
    pub fn new(processor: P, config: WorkerConfig) -> (JobQueue<J>, Self) {
        Self::with_arc_processor(Arc::new(processor), config)
    }

    /// Create a worker from an already-shared processor.
    pub fn with_arc_processor(processor: Arc<P>, config: WorkerConfig) -> (JobQueue<J>, Self) {
        let (sender, receiver) = mpsc::channel(config.queue_capacity);
        let semaphore = Arc::new(Semaphore::new(config.max_concurrent_jobs));

        let worker = Self {
            receiver,
            requeue: sender.clone(),
            processor,
            config,
            semaphore,
        };
        (JobQueue::new(sender), worker)
    }

    /// Run the worker loop until the shutdown signal flips to `true`.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> Result<(), QueueError> {
        info!(
            worker = %self.config.name,
            processor = %self.processor.name(),
            max_concurrent_jobs = self.config.max_concurrent_jobs,
            "Starting queue worker"
        );

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!(worker = %self.config.name, "Shutdown requested, draining in-flight jobs");
                        break;
                    }
                }
                maybe_job = self.receiver.recv() => {
                    match maybe_job {
                        Some(job) => self.dispatch(job).await?,
                        None => {
                            info!(worker = %self.config.name, "Job channel closed, stopping worker");
                            break;
                        }
                    }
                }
            }
        }

        // Wait for in-flight jobs by taking every concurrency permit.
        let _drain = self
            .semaphore
            .acquire_many(self.config.max_concurrent_jobs as u32)
            .await
            .map_err(|e| QueueError::Internal(e.to_string()))?;

        info!(worker = %self.config.name, "Queue worker stopped");
        Ok(())
    }

    async fn dispatch(&self, job: J) -> Result<(), QueueError> {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| QueueError::Internal(e.to_string()))?;

        let processor = Arc::clone(&self.processor);
        let requeue = self.requeue.clone();
        let retry_delay = self.config.retry_delay;

        tokio::spawn(async move {
            let job_id = job.job_id();
            let result = processor.process(&job).await;
            drop(permit);

            match result {
                Ok(()) => {
                    debug!(job_id = %job_id, "Job processed");
                }
                Err(e) if e.should_retry(job.retry_count(), job.max_retries()) => {
                    warn!(
                        job_id = %job_id,
                        retry_count = job.retry_count(),
                        error = %e,
                        "Job failed, scheduling retry"
                    );
                    let retried = job.with_retry();
                    tokio::spawn(async move {
                        tokio::time::sleep(retry_delay).await;
                        if requeue.send(retried).await.is_err() {
                            warn!(job_id = %job_id, "Worker stopped before retry, dropping job");
                        }
                    });
                }
                Err(e) => {
                    error!(
                        job_id = %job_id,
                        retry_count = job.retry_count(),
                        error = %e,
                        "Job failed permanently, dropping"
                    );
                }
            }
        });

        Ok(())
    }
}
