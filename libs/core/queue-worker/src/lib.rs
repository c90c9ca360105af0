//! # Queue Worker
//!
//! Generic in-process background job queue built on a bounded channel.
//!
//! Producers enqueue jobs through a cheap-to-clone [`JobQueue`] handle;
//! a [`QueueWorker`] drains the channel and dispatches each job to a
//! [`JobProcessor`], with bounded concurrency and fixed-delay retries
//! for transient failures.
//!
//! Jobs are best-effort: the queue is not persisted, and jobs still
//! in flight when the process exits are lost.
//!
//! ## Example
//!
//! ```rust,ignore
//! let config = WorkerConfig::new("email-worker").with_max_concurrent_jobs(4);
//! let (queue, worker) = QueueWorker::new(processor, config);
//!
//! let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//! tokio::spawn(async move { worker.run(shutdown_rx).await });
//!
//! queue.enqueue(job).await?;
//! ```

pub mod config;
pub mod error;
pub mod job;
pub mod processor;
pub mod queue;
pub mod worker;

pub use config::WorkerConfig;
pub use error::{ErrorCategory, QueueError};
pub use job::QueueJob;
pub use processor::JobProcessor;
pub use queue::JobQueue;
pub use worker::QueueWorker;
