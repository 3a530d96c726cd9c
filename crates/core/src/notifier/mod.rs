//! Notification dispatch.
//!
//! The final, best-effort pipeline stage: one email per recipient, sent
//! strictly one at a time with intra-batch and inter-batch delays to stay
//! under provider rate limits. Individual failures are recorded per item
//! and never abort the rest of the batch, in contrast to the fail-fast
//! upload and ledger stages.

mod dispatcher;
mod mailer;
mod types;

use async_trait::async_trait;
use thiserror::Error;

pub use dispatcher::{estimate_duration, format_eta, select_batch_size, NotificationDispatcher};
pub use mailer::{HttpMailer, MailerConfig};
pub use types::{
    BulkNotificationSummary, DispatchConfig, EmailAttachment, EmailMessage, NotificationItem,
    NotificationOutcome, SendReceipt, NO_RECIPIENT_REASON,
};

/// Errors from the mail transport.
#[derive(Debug, Error)]
pub enum MailError {
    /// The transport configuration is unusable.
    #[error("mail transport not configured: {0}")]
    NotConfigured(String),

    /// Could not reach the provider.
    #[error("mail provider unreachable: {0}")]
    ConnectionFailed(String),

    /// The provider did not answer within the configured timeout.
    #[error("mail provider request timed out")]
    Timeout,

    /// The provider rejected the request, message attached verbatim.
    #[error("mail provider error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The provider's response could not be decoded.
    #[error("failed to parse mail provider response: {0}")]
    ParseError(String),
}

/// A pooled transport that can deliver one email per call.
///
/// `verify` is called once at process startup; a failure there is logged
/// and ignored so a flaky provider cannot block service start.
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Name of this transport implementation.
    fn name(&self) -> &str;

    /// Check that the provider is reachable.
    async fn verify(&self) -> Result<(), MailError>;

    /// Deliver one message.
    async fn send(&self, message: &EmailMessage) -> Result<SendReceipt, MailError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mail_error_display() {
        let err = MailError::Api {
            status: 429,
            message: "rate limited".to_string(),
        };
        assert_eq!(err.to_string(), "mail provider error (429): rate limited");
    }
}
