//! Mock mail transport for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::notifier::{EmailMessage, MailError, MailTransport, SendReceipt};

/// A recorded send for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedSend {
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

/// Mock implementation of the MailTransport trait.
///
/// Sends can be failed per recipient, which is how tests model a provider
/// rejecting one address in the middle of a batch.
#[derive(Debug, Clone)]
pub struct MockMailTransport {
    /// Recorded successful sends, in call order.
    sends: Arc<RwLock<Vec<RecordedSend>>>,
    /// Number of send attempts, including failed ones.
    attempts: Arc<RwLock<usize>>,
    /// Recipients whose sends fail, with the provider message.
    failing_recipients: Arc<RwLock<HashMap<String, String>>>,
    /// Whether verify() succeeds.
    verify_ok: Arc<RwLock<bool>>,
}

impl Default for MockMailTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockMailTransport {
    pub fn new() -> Self {
        Self {
            sends: Arc::new(RwLock::new(Vec::new())),
            attempts: Arc::new(RwLock::new(0)),
            failing_recipients: Arc::new(RwLock::new(HashMap::new())),
            verify_ok: Arc::new(RwLock::new(true)),
        }
    }

    /// Get all successfully sent messages.
    pub async fn recorded_sends(&self) -> Vec<RecordedSend> {
        self.sends.read().await.clone()
    }

    /// Number of successful sends.
    pub async fn send_count(&self) -> usize {
        self.sends.read().await.len()
    }

    /// Number of send attempts, including failures.
    pub async fn attempt_count(&self) -> usize {
        *self.attempts.read().await
    }

    /// Make sends to `recipient` fail with the given provider message.
    pub async fn set_failing_recipient(&self, recipient: &str, message: &str) {
        self.failing_recipients
            .write()
            .await
            .insert(recipient.to_string(), message.to_string());
    }

    /// Set whether verify() succeeds.
    pub async fn set_verify_ok(&self, ok: bool) {
        *self.verify_ok.write().await = ok;
    }
}

#[async_trait]
impl MailTransport for MockMailTransport {
    fn name(&self) -> &str {
        "mock"
    }

    async fn verify(&self) -> Result<(), MailError> {
        if *self.verify_ok.read().await {
            Ok(())
        } else {
            Err(MailError::ConnectionFailed(
                "mock transport verification failed".to_string(),
            ))
        }
    }

    async fn send(&self, message: &EmailMessage) -> Result<SendReceipt, MailError> {
        *self.attempts.write().await += 1;

        if let Some(reason) = self.failing_recipients.read().await.get(&message.to) {
            return Err(MailError::Api {
                status: 550,
                message: reason.clone(),
            });
        }

        let mut sends = self.sends.write().await;
        sends.push(RecordedSend {
            to: message.to.clone(),
            subject: message.subject.clone(),
            html_body: message.html_body.clone(),
        });

        Ok(SendReceipt {
            message_id: format!("mock-msg-{}", sends.len()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(to: &str) -> EmailMessage {
        EmailMessage {
            to: to.to_string(),
            subject: "subject".to_string(),
            html_body: "<p>body</p>".to_string(),
            attachments: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_mock_mailer_records_sends() {
        let transport = MockMailTransport::new();
        let receipt = transport.send(&message("a@example.com")).await.unwrap();
        assert_eq!(receipt.message_id, "mock-msg-1");
        assert_eq!(transport.send_count().await, 1);
        assert_eq!(transport.attempt_count().await, 1);
    }

    #[tokio::test]
    async fn test_mock_mailer_failing_recipient() {
        let transport = MockMailTransport::new();
        transport
            .set_failing_recipient("bad@example.com", "mailbox unavailable")
            .await;

        let err = transport.send(&message("bad@example.com")).await.unwrap_err();
        assert!(matches!(err, MailError::Api { status: 550, .. }));
        assert_eq!(transport.send_count().await, 0);
        assert_eq!(transport.attempt_count().await, 1);

        assert!(transport.send(&message("ok@example.com")).await.is_ok());
        assert_eq!(transport.send_count().await, 1);
    }

    #[tokio::test]
    async fn test_mock_mailer_verify_toggle() {
        let transport = MockMailTransport::new();
        assert!(transport.verify().await.is_ok());
        transport.set_verify_ok(false).await;
        assert!(transport.verify().await.is_err());
    }
}
