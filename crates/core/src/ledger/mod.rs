//! Certificate registry ledger client.
//!
//! A batch is issued as exactly one signed transaction; the client blocks
//! until the transaction is confirmed and decodes the assigned sequential
//! IDs from the receipt's event log. If the transaction reverts or the
//! submission fails, the whole batch fails; partial ledger state is never
//! created.

mod client;
mod rpc;
mod signer;
mod types;

use async_trait::async_trait;
use thiserror::Error;

pub use client::LedgerClient;
pub use signer::IssuerSigner;
pub use types::{IssuanceRecord, LedgerConfig, LedgerIssuance, DEFAULT_MAX_BATCH_ITEMS};

/// Batch issuance against the certificate registry.
///
/// Implementations must serialize submissions internally: only one
/// transaction per signing identity may be in flight at a time.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Issue a single record.
    async fn issue(
        &self,
        name: &str,
        reg_no: &str,
        content_hash: &str,
        issuer_label: &str,
    ) -> Result<LedgerIssuance, LedgerError>;

    /// Issue a whole batch as one transaction.
    async fn bulk_issue(
        &self,
        names: &[String],
        reg_nos: &[String],
        content_hashes: &[String],
        issuer_label: &str,
    ) -> Result<Vec<LedgerIssuance>, LedgerError>;
}

/// Errors from the ledger client.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Bad input detected before any signing or network call.
    #[error("invalid issuance batch: {0}")]
    Validation(String),

    /// The configured signing key is unusable.
    #[error("invalid signing key: {0}")]
    InvalidKey(String),

    /// Could not reach the registry node.
    #[error("registry node unreachable: {0}")]
    ConnectionFailed(String),

    /// A single RPC request timed out.
    #[error("registry rpc request timed out")]
    Timeout,

    /// The node answered with an RPC-level error.
    #[error("registry rpc error ({code}): {message}")]
    Rpc { code: i64, message: String },

    /// The transaction was mined but reverted; nothing was issued.
    #[error("transaction reverted: {reason}")]
    Reverted { reason: String },

    /// The transaction was not confirmed within the configured window.
    #[error("transaction not confirmed within {secs}s")]
    ConfirmationTimeout { secs: u64 },

    /// Confirmed receipt carried a different number of issuance events
    /// than records submitted; positional ID mapping cannot be trusted.
    #[error("expected {expected} issuance events, found {actual}")]
    EventMismatch { expected: usize, actual: usize },

    /// A node response could not be decoded.
    #[error("failed to parse registry response: {0}")]
    ParseError(String),
}

impl LedgerError {
    /// Whether this error was raised before any network traffic.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::InvalidKey(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LedgerError::EventMismatch {
            expected: 10,
            actual: 9,
        };
        assert_eq!(err.to_string(), "expected 10 issuance events, found 9");

        let err = LedgerError::Reverted {
            reason: "registry paused".to_string(),
        };
        assert_eq!(err.to_string(), "transaction reverted: registry paused");
    }

    #[test]
    fn test_is_validation() {
        assert!(LedgerError::Validation("x".to_string()).is_validation());
        assert!(LedgerError::InvalidKey("x".to_string()).is_validation());
        assert!(!LedgerError::Timeout.is_validation());
    }
}
