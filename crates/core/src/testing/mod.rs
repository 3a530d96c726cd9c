//! Testing utilities and mock implementations for E2E tests.
//!
//! This module provides mock implementations of all external service
//! traits, allowing full pipeline testing without real infrastructure.
//!
//! # Example
//!
//! ```rust,ignore
//! use certo_core::testing::{MockContentStore, MockLedger, MockMailTransport, MockRenderer};
//!
//! let store = MockContentStore::new();
//! let ledger = MockLedger::new();
//! let transport = MockMailTransport::new();
//!
//! // Configure mock behavior
//! store.set_fail_at(2, "disk full").await;
//! transport.set_failing_recipient("bad@example.com", "mailbox unavailable").await;
//!
//! // Wire into a BulkOrchestrator...
//! ```

mod mock_content_store;
mod mock_ledger;
mod mock_mailer;
mod mock_renderer;

pub use mock_content_store::{MockContentStore, RecordedUpload};
pub use mock_ledger::{MockLedger, RecordedSubmission};
pub use mock_mailer::{MockMailTransport, RecordedSend};
pub use mock_renderer::MockRenderer;

/// Test fixtures and helper functions.
pub mod fixtures {
    use std::collections::HashMap;

    use crate::renderer::IssuanceRequest;

    /// Create a test issuance request with a recipient email.
    pub fn issuance_request(name: &str, registration_id: &str) -> IssuanceRequest {
        IssuanceRequest {
            subject_name: name.to_string(),
            registration_id: registration_id.to_string(),
            custom_fields: HashMap::new(),
            recipient_email: Some(format!(
                "{}@example.com",
                name.to_lowercase().replace(' ', ".")
            )),
        }
    }

    /// Create a test issuance request without a recipient.
    pub fn request_without_email(name: &str, registration_id: &str) -> IssuanceRequest {
        IssuanceRequest {
            recipient_email: None,
            ..issuance_request(name, registration_id)
        }
    }

    /// Create an ordered batch of `n` requests, all with recipients.
    pub fn batch(n: usize) -> Vec<IssuanceRequest> {
        (1..=n)
            .map(|i| issuance_request(&format!("subject{:03}", i), &format!("REG-{:03}", i)))
            .collect()
    }
}
