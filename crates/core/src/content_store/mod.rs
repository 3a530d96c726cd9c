//! Content-addressable artifact storage.
//!
//! Uploads are irreversible: there is no delete or rollback path in this
//! design, and the pipeline accepts orphaned artifacts when a later stage
//! aborts a job.

mod http;
mod types;

use async_trait::async_trait;
use thiserror::Error;

use crate::compressor::ArtifactMime;

pub use http::HttpContentStore;
pub use types::{StoreConfig, UploadResult, DEFAULT_MAX_UPLOAD_BYTES};

/// Errors from the content store client.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Bad input detected before any network call. Never retried.
    #[error("invalid upload: {0}")]
    Validation(String),

    /// Could not reach the provider.
    #[error("content store unreachable: {0}")]
    ConnectionFailed(String),

    /// The provider did not answer within the configured timeout.
    #[error("content store request timed out")]
    Timeout,

    /// The provider answered with an error, message attached verbatim.
    #[error("content store error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The provider's response could not be decoded.
    #[error("failed to parse content store response: {0}")]
    ParseError(String),
}

impl StoreError {
    /// Whether this error was raised before any network traffic.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// One-shot artifact upload to content-addressable storage.
///
/// Implementations perform exactly one attempt per call and never retry
/// internally; the caller decides whether to retry the whole job.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Name of this backend implementation.
    fn name(&self) -> &str;

    /// Upload one artifact and return its content address.
    async fn upload(
        &self,
        bytes: &[u8],
        filename: &str,
        mime: ArtifactMime,
    ) -> Result<UploadResult, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        let err = StoreError::Api {
            status: 503,
            message: "pinning backlog".to_string(),
        };
        assert_eq!(err.to_string(), "content store error (503): pinning backlog");
    }

    #[test]
    fn test_is_validation() {
        assert!(StoreError::Validation("too large".to_string()).is_validation());
        assert!(!StoreError::Timeout.is_validation());
    }
}
