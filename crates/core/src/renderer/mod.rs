//! Certificate artifact rendering.
//!
//! The orchestrator renders through the [`CertificateRenderer`] seam so the
//! template implementation can be swapped (or mocked) without touching the
//! pipeline. The built-in implementation produces a single-page PDF.

mod pdf;
mod types;

use async_trait::async_trait;

use crate::compressor::Artifact;

pub use pdf::PdfCertificateRenderer;
pub use types::{IssuanceRequest, RenderError, RendererConfig};

/// Produces one certificate artifact per issuance request.
#[async_trait]
pub trait CertificateRenderer: Send + Sync {
    /// Name of this renderer implementation.
    fn name(&self) -> &str;

    /// Render the certificate for one request.
    async fn render(&self, request: &IssuanceRequest) -> Result<Artifact, RenderError>;
}

/// A small real certificate PDF for tests elsewhere in the crate.
#[cfg(test)]
pub(crate) fn test_certificate_pdf() -> Vec<u8> {
    let renderer = PdfCertificateRenderer::new(RendererConfig::default());
    let request = IssuanceRequest {
        subject_name: "Test Subject".to_string(),
        registration_id: "REG-TEST".to_string(),
        custom_fields: Default::default(),
        recipient_email: None,
    };
    futures::executor::block_on(renderer.render(&request))
        .expect("test certificate should render")
        .bytes
}
