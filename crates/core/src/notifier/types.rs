//! Types for notification dispatch.

use serde::{Deserialize, Serialize};

/// Recorded reason when an item has nobody to notify.
pub const NO_RECIPIENT_REASON: &str = "no recipient";

/// A file attached to an outgoing email.
#[derive(Debug, Clone)]
pub struct EmailAttachment {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// One outgoing email.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html_body: String,
    pub attachments: Vec<EmailAttachment>,
}

/// Provider acknowledgement for a sent message.
#[derive(Debug, Clone)]
pub struct SendReceipt {
    pub message_id: String,
}

/// One notification to dispatch; the payload without a resolved recipient.
#[derive(Debug, Clone)]
pub struct NotificationItem {
    pub recipient: Option<String>,
    pub subject: String,
    pub html_body: String,
    pub attachments: Vec<EmailAttachment>,
}

/// Per-item dispatch outcome, index-aligned with the input items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationOutcome {
    pub recipient: Option<String>,
    pub success: bool,
    pub error_reason: Option<String>,
}

impl NotificationOutcome {
    /// The item carried no usable recipient. Counts as a failure.
    pub fn no_recipient() -> Self {
        Self {
            recipient: None,
            success: false,
            error_reason: Some(NO_RECIPIENT_REASON.to_string()),
        }
    }

    pub fn delivered(recipient: &str) -> Self {
        Self {
            recipient: Some(recipient.to_string()),
            success: true,
            error_reason: None,
        }
    }

    pub fn failed(recipient: &str, reason: String) -> Self {
        Self {
            recipient: Some(recipient.to_string()),
            success: false,
            error_reason: Some(reason),
        }
    }
}

/// Aggregate result of one dispatch call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkNotificationSummary {
    pub outcomes: Vec<NotificationOutcome>,
    pub success_count: usize,
    pub failure_count: usize,
    pub total: usize,
}

/// Dispatch pacing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Overrides the count-based batch size selection when set.
    #[serde(default)]
    pub batch_size: Option<usize>,
    /// Delay between consecutive sends inside a batch (default: 200 ms).
    #[serde(default = "default_email_delay")]
    pub email_delay_ms: u64,
    /// Delay between batches (default: 2000 ms).
    #[serde(default = "default_batch_delay")]
    pub batch_delay_ms: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            batch_size: None,
            email_delay_ms: default_email_delay(),
            batch_delay_ms: default_batch_delay(),
        }
    }
}

fn default_email_delay() -> u64 {
    200
}

fn default_batch_delay() -> u64 {
    2000
}
