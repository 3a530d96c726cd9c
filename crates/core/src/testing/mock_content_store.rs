//! Mock content store for testing.

use async_trait::async_trait;
use chrono::Utc;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::compressor::ArtifactMime;
use crate::content_store::{ContentStore, StoreError, UploadResult};

/// A recorded upload for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedUpload {
    pub filename: String,
    pub size_bytes: usize,
    pub mime: ArtifactMime,
    pub content_hash: String,
}

/// Mock implementation of the ContentStore trait.
///
/// Content hashes are derived from the uploaded bytes, so identical input
/// yields identical addresses, like a real content-addressable store.
#[derive(Debug, Clone)]
pub struct MockContentStore {
    /// Recorded uploads, in call order.
    uploads: Arc<RwLock<Vec<RecordedUpload>>>,
    /// If set, the upload at this zero-based index fails with the error.
    fail_at: Arc<RwLock<Option<(usize, String)>>>,
    /// If set, the next upload fails with this error.
    next_error: Arc<RwLock<Option<StoreError>>>,
    /// Simulated upload duration in milliseconds.
    upload_duration_ms: Arc<RwLock<u64>>,
}

impl Default for MockContentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MockContentStore {
    pub fn new() -> Self {
        Self {
            uploads: Arc::new(RwLock::new(Vec::new())),
            fail_at: Arc::new(RwLock::new(None)),
            next_error: Arc::new(RwLock::new(None)),
            upload_duration_ms: Arc::new(RwLock::new(0)),
        }
    }

    /// Get all recorded uploads.
    pub async fn recorded_uploads(&self) -> Vec<RecordedUpload> {
        self.uploads.read().await.clone()
    }

    /// Number of uploads performed (successful ones only).
    pub async fn upload_count(&self) -> usize {
        self.uploads.read().await.len()
    }

    /// Configure the next upload to fail.
    pub async fn set_next_error(&self, error: StoreError) {
        *self.next_error.write().await = Some(error);
    }

    /// Make the n-th upload (zero-based) fail with the given message.
    pub async fn set_fail_at(&self, index: usize, message: &str) {
        *self.fail_at.write().await = Some((index, message.to_string()));
    }

    /// Set the simulated upload duration.
    pub async fn set_upload_duration(&self, duration: Duration) {
        *self.upload_duration_ms.write().await = duration.as_millis() as u64;
    }
}

#[async_trait]
impl ContentStore for MockContentStore {
    fn name(&self) -> &str {
        "mock"
    }

    async fn upload(
        &self,
        bytes: &[u8],
        filename: &str,
        mime: ArtifactMime,
    ) -> Result<UploadResult, StoreError> {
        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }
        if let Some((index, message)) = self.fail_at.read().await.clone() {
            if self.uploads.read().await.len() == index {
                return Err(StoreError::Api {
                    status: 500,
                    message,
                });
            }
        }

        let duration_ms = *self.upload_duration_ms.read().await;
        if duration_ms > 0 {
            tokio::time::sleep(Duration::from_millis(duration_ms)).await;
        }

        let digest = Sha256::digest(bytes);
        let content_hash = format!("bafy{}", hex::encode(&digest[..12]));

        self.uploads.write().await.push(RecordedUpload {
            filename: filename.to_string(),
            size_bytes: bytes.len(),
            mime,
            content_hash: content_hash.clone(),
        });

        Ok(UploadResult {
            gateway_url: format!("https://gateway.test/{}", content_hash),
            content_hash,
            size_bytes: bytes.len() as u64,
            uploaded_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_store_hashes_are_content_derived() {
        let store = MockContentStore::new();
        let a = store.upload(b"same", "a.pdf", ArtifactMime::Pdf).await.unwrap();
        let b = store.upload(b"same", "b.pdf", ArtifactMime::Pdf).await.unwrap();
        let c = store.upload(b"other", "c.pdf", ArtifactMime::Pdf).await.unwrap();

        assert_eq!(a.content_hash, b.content_hash);
        assert_ne!(a.content_hash, c.content_hash);
        assert_eq!(store.upload_count().await, 3);
    }

    #[tokio::test]
    async fn test_mock_store_fail_at_index() {
        let store = MockContentStore::new();
        store.set_fail_at(1, "disk full").await;

        assert!(store.upload(b"one", "1.pdf", ArtifactMime::Pdf).await.is_ok());
        let err = store
            .upload(b"two", "2.pdf", ArtifactMime::Pdf)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Api { status: 500, .. }));
        assert_eq!(store.upload_count().await, 1);
    }
}
