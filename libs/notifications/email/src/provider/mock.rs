//! Mock email provider for development and testing

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use eyre::Result;
use tokio::sync::Mutex;

use super::{EmailProvider, SendResult};
use crate::models::Email;

/// Mock email provider that captures sent emails
pub struct MockSmtpProvider {
    sent_emails: Arc<Mutex<Vec<Email>>>,
    attempts: AtomicU32,
    fail_first: u32,
    always_fail: bool,
}

impl MockSmtpProvider {
    /// Create a new mock provider
    pub fn new() -> Self {
        Self {
            sent_emails: Arc::new(Mutex::new(Vec::new())),
            attempts: AtomicU32::new(0),
            fail_first: 0,
            always_fail: false,
        }
    }

    /// Create a mock provider that always fails
    pub fn failing() -> Self {
        Self {
            always_fail: true,
            ..Self::new()
        }
    }

    /// Create a mock provider that fails the first `n` send attempts,
    /// then succeeds. Useful for exercising retry paths.
    pub fn failing_times(n: u32) -> Self {
        Self {
            fail_first: n,
            ..Self::new()
        }
    }

    /// Get all sent emails
    pub async fn sent_emails(&self) -> Vec<Email> {
        self.sent_emails.lock().await.clone()
    }

    /// Get the count of sent emails
    pub async fn sent_count(&self) -> usize {
        self.sent_emails.lock().await.len()
    }

    /// Total send attempts, including failed ones
    pub fn attempt_count(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Clear all sent emails
    pub async fn clear(&self) {
        self.sent_emails.lock().await.clear();
    }

    /// Check if an email was sent to a specific address
    pub async fn was_sent_to(&self, email: &str) -> bool {
        self.sent_emails.lock().await.iter().any(|e| e.to == email)
    }
}

impl Default for MockSmtpProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmailProvider for MockSmtpProvider {
    async fn send(&self, email: &Email) -> Result<SendResult> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);

        if self.always_fail || attempt < self.fail_first {
            return Err(eyre::eyre!("Mock send failure"));
        }

        self.sent_emails.lock().await.push(email.clone());

        Ok(SendResult {
            message_id: format!("mock-{}", email.id),
        })
    }

    async fn health_check(&self) -> Result<()> {
        if self.always_fail {
            return Err(eyre::eyre!("Mock health check failed"));
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_provider_sends_email() {
        let provider = MockSmtpProvider::new();
        let email = Email::new("test@example.com", "Test Subject").with_text("Test body");

        provider.send(&email).await.unwrap();

        let sent = provider.sent_emails().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "test@example.com");
        assert!(provider.was_sent_to("test@example.com").await);
        assert!(!provider.was_sent_to("other@example.com").await);
    }

    #[tokio::test]
    async fn test_mock_provider_always_fails() {
        let provider = MockSmtpProvider::failing();
        let email = Email::new("test@example.com", "Test").with_text("Body");

        assert!(provider.send(&email).await.is_err());
        assert_eq!(provider.sent_count().await, 0);
    }

    #[tokio::test]
    async fn test_mock_provider_fails_then_succeeds() {
        let provider = MockSmtpProvider::failing_times(2);
        let email = Email::new("test@example.com", "Test").with_text("Body");

        assert!(provider.send(&email).await.is_err());
        assert!(provider.send(&email).await.is_err());
        assert!(provider.send(&email).await.is_ok());
        assert_eq!(provider.attempt_count(), 3);
        assert_eq!(provider.sent_count().await, 1);
    }
}
