//! Built-in single-page PDF certificate renderer.

use async_trait::async_trait;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use crate::compressor::{Artifact, ArtifactMime};

use super::types::{IssuanceRequest, RenderError, RendererConfig};
use super::CertificateRenderer;

// A4 in points.
const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;

/// Renders a one-page certificate PDF: title, subject name, registration
/// id, custom fields, issuer line.
pub struct PdfCertificateRenderer {
    config: RendererConfig,
}

impl PdfCertificateRenderer {
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    fn build_document(&self, request: &IssuanceRequest) -> Result<Vec<u8>, RenderError> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let content = Content {
            operations: certificate_operations(&self.config, request),
        };
        let encoded = content
            .encode()
            .map_err(|e| RenderError::TemplateFailed(e.to_string()))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal(self.config.title.clone()),
            "Producer" => Object::string_literal("certo"),
        });
        doc.trailer.set("Info", info_id);

        let mut out = Vec::new();
        doc.save_to(&mut out)
            .map_err(|e| RenderError::TemplateFailed(e.to_string()))?;
        Ok(out)
    }
}

#[async_trait]
impl CertificateRenderer for PdfCertificateRenderer {
    fn name(&self) -> &str {
        "pdf"
    }

    async fn render(&self, request: &IssuanceRequest) -> Result<Artifact, RenderError> {
        if request.subject_name.trim().is_empty() {
            return Err(RenderError::IncompleteRequest(
                "subject_name is empty".to_string(),
            ));
        }
        if request.registration_id.trim().is_empty() {
            return Err(RenderError::IncompleteRequest(
                "registration_id is empty".to_string(),
            ));
        }

        let bytes = self.build_document(request)?;
        Ok(Artifact::new(bytes, ArtifactMime::Pdf))
    }
}

fn text_line(font_size: i64, x: i64, y: i64, text: &str) -> Vec<Operation> {
    vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), font_size.into()]),
        Operation::new("Td", vec![x.into(), y.into()]),
        Operation::new("Tj", vec![Object::string_literal(text)]),
        Operation::new("ET", vec![]),
    ]
}

fn certificate_operations(config: &RendererConfig, request: &IssuanceRequest) -> Vec<Operation> {
    let mut ops = Vec::new();
    ops.extend(text_line(28, 100, 700, &config.title));
    ops.extend(text_line(20, 100, 620, &request.subject_name));
    ops.extend(text_line(
        12,
        100,
        580,
        &format!("Registration no. {}", request.registration_id),
    ));

    // Deterministic field order so identical requests render identical bytes.
    let mut fields: Vec<_> = request.custom_fields.iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));

    let mut y = 540;
    for (key, value) in fields {
        ops.extend(text_line(11, 100, y, &format!("{}: {}", key, value)));
        y -= 22;
    }

    ops.extend(text_line(
        11,
        100,
        y - 30,
        &format!("Issued by {}", config.issued_by),
    ));
    ops
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn request(name: &str, reg: &str) -> IssuanceRequest {
        IssuanceRequest {
            subject_name: name.to_string(),
            registration_id: reg.to_string(),
            custom_fields: HashMap::new(),
            recipient_email: None,
        }
    }

    #[tokio::test]
    async fn test_render_produces_parseable_pdf() {
        let renderer = PdfCertificateRenderer::new(RendererConfig::default());
        let artifact = renderer.render(&request("Ada Lovelace", "REG-001")).await.unwrap();

        assert_eq!(artifact.mime, ArtifactMime::Pdf);
        assert!(!artifact.is_empty());
        assert!(Document::load_mem(&artifact.bytes).is_ok());
    }

    #[tokio::test]
    async fn test_render_is_deterministic() {
        let renderer = PdfCertificateRenderer::new(RendererConfig::default());
        let mut req = request("Grace Hopper", "REG-002");
        req.custom_fields.insert("course".to_string(), "Compilers".to_string());
        req.custom_fields.insert("grade".to_string(), "A".to_string());

        let a = renderer.render(&req).await.unwrap();
        let b = renderer.render(&req).await.unwrap();
        assert_eq!(a.bytes, b.bytes);
    }

    #[tokio::test]
    async fn test_render_rejects_blank_subject() {
        let renderer = PdfCertificateRenderer::new(RendererConfig::default());
        let result = renderer.render(&request("  ", "REG-003")).await;
        assert!(matches!(result, Err(RenderError::IncompleteRequest(_))));
    }

    #[tokio::test]
    async fn test_render_rejects_blank_registration_id() {
        let renderer = PdfCertificateRenderer::new(RendererConfig::default());
        let result = renderer.render(&request("Ada", "")).await;
        assert!(matches!(result, Err(RenderError::IncompleteRequest(_))));
    }
}
