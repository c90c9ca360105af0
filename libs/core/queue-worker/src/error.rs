//! Queue error types and error categorization
//!
//! Errors are categorized to determine retry behavior:
//! - **Transient**: Temporary failures, re-enqueued after a fixed delay
//! - **Permanent**: Unrecoverable errors, job is dropped immediately

use thiserror::Error;

/// Category of error for determining retry behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Temporary failure, the job is retried after a fixed delay
    Transient,
    /// Unrecoverable error, the job is dropped immediately
    Permanent,
}

/// Queue processing errors
#[derive(Error, Debug)]
pub enum QueueError {
    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Job processing failed
    #[error("Processing error: {message}")]
    Processing {
        message: String,
        category: ErrorCategory,
    },

    /// Queue channel closed, no worker is draining it
    #[error("Queue closed")]
    Closed,

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl QueueError {
    /// Create a transient processing error
    pub fn transient(message: impl Into<String>) -> Self {
        QueueError::Processing {
            message: message.into(),
            category: ErrorCategory::Transient,
        }
    }

    /// Create a permanent processing error
    pub fn permanent(message: impl Into<String>) -> Self {
        QueueError::Processing {
            message: message.into(),
            category: ErrorCategory::Permanent,
        }
    }

    /// Get the error category
    pub fn category(&self) -> ErrorCategory {
        match self {
            QueueError::Serialization(_) => ErrorCategory::Permanent,
            QueueError::Processing { category, .. } => *category,
            QueueError::Closed => ErrorCategory::Permanent,
            QueueError::Internal(_) => ErrorCategory::Permanent,
        }
    }

    /// Check if this error should trigger a retry given the retries
    /// already attempted.
    pub fn should_retry(&self, retry_count: u32, max_retries: u32) -> bool {
        self.category() != ErrorCategory::Permanent && retry_count < max_retries
    }
}

impl From<serde_json::Error> for QueueError {
    fn from(err: serde_json::Error) -> Self {
        QueueError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        assert_eq!(
            QueueError::transient("test").category(),
            ErrorCategory::Transient
        );
        assert_eq!(
            QueueError::permanent("test").category(),
            ErrorCategory::Permanent
        );
        assert_eq!(
            QueueError::Serialization("bad json".to_string()).category(),
            ErrorCategory::Permanent
        );
    }

    #[test]
    fn test_should_retry() {
        let transient = QueueError::transient("test");
        assert!(transient.should_retry(0, 3));
        assert!(transient.should_retry(2, 3));
        assert!(!transient.should_retry(3, 3));

        let permanent = QueueError::permanent("test");
        assert!(!permanent.should_retry(0, 3));
    }
}
