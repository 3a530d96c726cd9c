//! Batched, rate-limited notification dispatch.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, warn};

use super::types::{
    BulkNotificationSummary, DispatchConfig, EmailMessage, NotificationItem, NotificationOutcome,
};
use super::MailTransport;

/// Fixed per-item processing overhead assumed by the ETA estimate.
const PROCESSING_OVERHEAD_MS: u64 = 500;

/// Pick a batch size from the total item count.
///
/// Pure function; the boundaries are part of the dispatch contract.
pub fn select_batch_size(count: usize) -> usize {
    if count <= 10 {
        5
    } else if count <= 50 {
        10
    } else if count <= 200 {
        15
    } else {
        20
    }
}

/// Advisory duration estimate for dispatching `total` items.
pub fn estimate_duration(total: usize, batch_size: usize, config: &DispatchConfig) -> Duration {
    if total == 0 || batch_size == 0 {
        return Duration::ZERO;
    }
    let batches = total.div_ceil(batch_size) as u64;
    let total = total as u64;
    let ms = total * config.email_delay_ms
        + (batches - 1) * config.batch_delay_ms
        + total * PROCESSING_OVERHEAD_MS;
    Duration::from_millis(ms)
}

/// Format an estimate as `"N seconds"` or `"M min S sec"`, rounded up to
/// whole seconds.
pub fn format_eta(duration: Duration) -> String {
    let secs = duration.as_millis().div_ceil(1000) as u64;
    if secs < 60 {
        format!("{} seconds", secs)
    } else {
        format!("{} min {} sec", secs / 60, secs % 60)
    }
}

/// Explicit accumulator for the per-item outcome fold.
struct OutcomeAccumulator {
    outcomes: Vec<NotificationOutcome>,
    success_count: usize,
    failure_count: usize,
}

impl OutcomeAccumulator {
    fn with_capacity(total: usize) -> Self {
        Self {
            outcomes: Vec::with_capacity(total),
            success_count: 0,
            failure_count: 0,
        }
    }

    fn record(&mut self, outcome: NotificationOutcome) {
        if outcome.success {
            self.success_count += 1;
        } else {
            self.failure_count += 1;
        }
        self.outcomes.push(outcome);
    }

    fn into_summary(self) -> BulkNotificationSummary {
        BulkNotificationSummary {
            total: self.outcomes.len(),
            outcomes: self.outcomes,
            success_count: self.success_count,
            failure_count: self.failure_count,
        }
    }
}

/// Sends notifications through a pooled transport with intra-batch and
/// inter-batch delays. Individual failures are recorded, never propagated:
/// this stage is best-effort by design.
pub struct NotificationDispatcher {
    transport: Arc<dyn MailTransport>,
    config: DispatchConfig,
}

impl NotificationDispatcher {
    pub fn new(transport: Arc<dyn MailTransport>, config: DispatchConfig) -> Self {
        Self { transport, config }
    }

    /// Batch size for `count` items, honoring the configured override.
    pub fn effective_batch_size(&self, count: usize) -> usize {
        self.config
            .batch_size
            .filter(|&n| n > 0)
            .unwrap_or_else(|| select_batch_size(count))
    }

    /// Human-readable ETA for dispatching `count` items.
    pub fn eta(&self, count: usize) -> String {
        let batch_size = self.effective_batch_size(count);
        format_eta(estimate_duration(count, batch_size, &self.config))
    }

    /// Dispatch every item, one at a time, in order.
    ///
    /// Sleeps `email_delay_ms` after every send except the last item of the
    /// last batch, and `batch_delay_ms` after every batch except the final
    /// one.
    pub async fn dispatch(&self, items: &[NotificationItem]) -> BulkNotificationSummary {
        let total = items.len();
        let batch_size = self.effective_batch_size(total);
        let email_delay = Duration::from_millis(self.config.email_delay_ms);
        let batch_delay = Duration::from_millis(self.config.batch_delay_ms);

        let batches: Vec<&[NotificationItem]> = items.chunks(batch_size.max(1)).collect();
        let batch_count = batches.len();

        debug!(
            total,
            batch_size,
            batch_count,
            eta = %self.eta(total),
            "dispatching notifications"
        );

        let mut acc = OutcomeAccumulator::with_capacity(total);

        for (batch_idx, batch) in batches.iter().enumerate() {
            let last_batch = batch_idx + 1 == batch_count;

            for (item_idx, item) in batch.iter().enumerate() {
                acc.record(self.send_one(item).await);

                let last_overall = last_batch && item_idx + 1 == batch.len();
                if !last_overall {
                    sleep(email_delay).await;
                }
            }

            if !last_batch {
                sleep(batch_delay).await;
            }
        }

        acc.into_summary()
    }

    async fn send_one(&self, item: &NotificationItem) -> NotificationOutcome {
        let recipient = item
            .recipient
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty());

        let Some(recipient) = recipient else {
            return NotificationOutcome::no_recipient();
        };

        let message = EmailMessage {
            to: recipient.to_string(),
            subject: item.subject.clone(),
            html_body: item.html_body.clone(),
            attachments: item.attachments.clone(),
        };

        match self.transport.send(&message).await {
            Ok(receipt) => {
                debug!(recipient, message_id = %receipt.message_id, "notification sent");
                NotificationOutcome::delivered(recipient)
            }
            Err(e) => {
                warn!(recipient, "notification send failed: {}", e);
                NotificationOutcome::failed(recipient, e.to_string())
            }
        }
    }
}
