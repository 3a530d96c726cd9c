//! HTTP pinning-service backend for the content store.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::compressor::ArtifactMime;

use super::types::{StoreConfig, UploadResult};
use super::{ContentStore, StoreError};

/// Content store backed by an HTTP pinning service.
///
/// One multipart POST per artifact: the file part plus a `metadata` JSON
/// part carrying the display name, artifact type and client timestamp.
pub struct HttpContentStore {
    client: Client,
    config: StoreConfig,
}

/// Provider response for a successful pin.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PinResponse {
    content_hash: String,
    size_bytes: u64,
    timestamp: DateTime<Utc>,
}

impl HttpContentStore {
    /// Create a new client. Fails fast on an unusable configuration.
    pub fn new(config: StoreConfig) -> Result<Self, StoreError> {
        if config.api_key.is_empty() {
            return Err(StoreError::Validation(
                "content store API key is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn pin_url(&self) -> String {
        format!("{}/api/v1/pins", self.config.api_url.trim_end_matches('/'))
    }

    fn gateway_url(&self, content_hash: &str) -> String {
        format!(
            "{}/{}",
            self.config.gateway_url.trim_end_matches('/'),
            content_hash
        )
    }

    fn check_preconditions(&self, bytes: &[u8]) -> Result<(), StoreError> {
        if bytes.is_empty() {
            return Err(StoreError::Validation("artifact is empty".to_string()));
        }
        if bytes.len() > self.config.max_upload_bytes {
            return Err(StoreError::Validation(format!(
                "artifact is {} bytes, limit is {}",
                bytes.len(),
                self.config.max_upload_bytes
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl ContentStore for HttpContentStore {
    fn name(&self) -> &str {
        "http-pinning"
    }

    async fn upload(
        &self,
        bytes: &[u8],
        filename: &str,
        mime: ArtifactMime,
    ) -> Result<UploadResult, StoreError> {
        self.check_preconditions(bytes)?;

        let metadata = serde_json::json!({
            "name": filename,
            "type": "certificate",
            "timestamp": Utc::now().to_rfc3339(),
        });

        let file_part = Part::bytes(bytes.to_vec())
            .file_name(filename.to_string())
            .mime_str(mime.as_str())
            .map_err(|e| StoreError::Validation(e.to_string()))?;
        let form = Form::new()
            .part("file", file_part)
            .text("metadata", metadata.to_string());

        debug!(filename, size = bytes.len(), %mime, "uploading artifact");

        let response = self
            .client
            .post(self.pin_url())
            .bearer_auth(&self.config.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    StoreError::Timeout
                } else {
                    StoreError::ConnectionFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StoreError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let pin: PinResponse = response
            .json()
            .await
            .map_err(|e| StoreError::ParseError(e.to_string()))?;

        Ok(UploadResult {
            gateway_url: self.gateway_url(&pin.content_hash),
            content_hash: pin.content_hash,
            size_bytes: pin.size_bytes,
            uploaded_at: pin.timestamp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> StoreConfig {
        StoreConfig {
            api_url: "https://pin.example.com/".to_string(),
            api_key: "test-key".to_string(),
            gateway_url: "https://gateway.example.com/".to_string(),
            timeout_secs: 5,
            max_upload_bytes: 64,
        }
    }

    #[test]
    fn test_new_requires_api_key() {
        let mut cfg = config();
        cfg.api_key = String::new();
        assert!(matches!(
            HttpContentStore::new(cfg),
            Err(StoreError::Validation(_))
        ));
    }

    #[test]
    fn test_url_building_trims_trailing_slash() {
        let store = HttpContentStore::new(config()).unwrap();
        assert_eq!(store.pin_url(), "https://pin.example.com/api/v1/pins");
        assert_eq!(
            store.gateway_url("bafyhash"),
            "https://gateway.example.com/bafyhash"
        );
    }

    #[tokio::test]
    async fn test_upload_rejects_oversized_artifact_before_network() {
        let store = HttpContentStore::new(config()).unwrap();
        let oversized = vec![0u8; 65];
        let result = store
            .upload(&oversized, "cert.pdf", ArtifactMime::Pdf)
            .await;
        assert!(matches!(result, Err(StoreError::Validation(_))));
    }

    #[tokio::test]
    async fn test_upload_rejects_empty_artifact() {
        let store = HttpContentStore::new(config()).unwrap();
        let result = store.upload(&[], "cert.pdf", ArtifactMime::Pdf).await;
        assert!(matches!(result, Err(StoreError::Validation(_))));
    }
}
