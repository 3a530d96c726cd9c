//! Types for certificate rendering.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One record to issue. Immutable once accepted into a batch; every stage
/// reads it, none mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuanceRequest {
    /// Name of the person or entity the certificate is issued to.
    pub subject_name: String,
    /// Registry number recorded on the ledger alongside the name.
    pub registration_id: String,
    /// Free-form template fields (course title, grade, date, ...).
    #[serde(default)]
    pub custom_fields: HashMap<String, String>,
    /// Where to send the notification. Absent or blank means the item is
    /// recorded as a notification failure, not skipped.
    #[serde(default)]
    pub recipient_email: Option<String>,
}

/// Errors from certificate rendering. Any of these aborts the whole job.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The request is missing data the template requires.
    #[error("incomplete request: {0}")]
    IncompleteRequest(String),

    /// The template artifact could not be produced.
    #[error("template rendering failed: {0}")]
    TemplateFailed(String),
}

/// Configuration for the built-in PDF renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RendererConfig {
    /// Heading printed at the top of the certificate.
    #[serde(default = "default_title")]
    pub title: String,
    /// Line identifying the issuing organization.
    #[serde(default = "default_issued_by")]
    pub issued_by: String,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            issued_by: default_issued_by(),
        }
    }
}

fn default_title() -> String {
    "Certificate of Completion".to_string()
}

fn default_issued_by() -> String {
    "certo".to_string()
}
