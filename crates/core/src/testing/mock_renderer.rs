//! Mock certificate renderer for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::compressor::{Artifact, ArtifactMime};
use crate::renderer::{CertificateRenderer, IssuanceRequest, RenderError};

/// Mock implementation of the CertificateRenderer trait.
///
/// Records every rendered request and can be told to fail the next call.
#[derive(Debug, Clone)]
pub struct MockRenderer {
    /// Requests rendered so far.
    rendered: Arc<RwLock<Vec<IssuanceRequest>>>,
    /// If set, the next render fails with this error.
    next_error: Arc<RwLock<Option<RenderError>>>,
    /// Size of the artifact each render produces.
    artifact_size: Arc<RwLock<usize>>,
    /// Mime type of the produced artifact.
    artifact_mime: Arc<RwLock<ArtifactMime>>,
}

impl Default for MockRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRenderer {
    pub fn new() -> Self {
        Self {
            rendered: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            artifact_size: Arc::new(RwLock::new(128)),
            artifact_mime: Arc::new(RwLock::new(ArtifactMime::Pdf)),
        }
    }

    /// Get all requests rendered so far.
    pub async fn rendered_requests(&self) -> Vec<IssuanceRequest> {
        self.rendered.read().await.clone()
    }

    /// Number of render calls.
    pub async fn render_count(&self) -> usize {
        self.rendered.read().await.len()
    }

    /// Configure the next render to fail.
    pub async fn set_next_error(&self, error: RenderError) {
        *self.next_error.write().await = Some(error);
    }

    /// Set the byte size of produced artifacts.
    pub async fn set_artifact_size(&self, size: usize) {
        *self.artifact_size.write().await = size;
    }

    /// Set the mime type of produced artifacts.
    pub async fn set_artifact_mime(&self, mime: ArtifactMime) {
        *self.artifact_mime.write().await = mime;
    }
}

#[async_trait]
impl CertificateRenderer for MockRenderer {
    fn name(&self) -> &str {
        "mock"
    }

    async fn render(&self, request: &IssuanceRequest) -> Result<Artifact, RenderError> {
        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }

        self.rendered.write().await.push(request.clone());

        let size = *self.artifact_size.read().await;
        let mime = *self.artifact_mime.read().await;
        // Deterministic filler derived from the registration id.
        let seed = request.registration_id.bytes().next().unwrap_or(b'x');
        Ok(Artifact::new(vec![seed; size], mime))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[tokio::test]
    async fn test_mock_renderer_records_requests() {
        let renderer = MockRenderer::new();
        let request = fixtures::issuance_request("Ada", "REG-1");

        let artifact = renderer.render(&request).await.unwrap();
        assert_eq!(artifact.len(), 128);
        assert_eq!(renderer.render_count().await, 1);
        assert_eq!(
            renderer.rendered_requests().await[0].subject_name,
            "Ada"
        );
    }

    #[tokio::test]
    async fn test_mock_renderer_next_error() {
        let renderer = MockRenderer::new();
        renderer
            .set_next_error(RenderError::TemplateFailed("boom".to_string()))
            .await;

        let request = fixtures::issuance_request("Ada", "REG-1");
        assert!(renderer.render(&request).await.is_err());
        // The failed call is not recorded, the next one succeeds.
        assert_eq!(renderer.render_count().await, 0);
        assert!(renderer.render(&request).await.is_ok());
    }
}
