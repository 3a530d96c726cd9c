//! Types for the content store client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Hard ceiling on a single artifact upload: 10 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Result of one successful upload, index-aligned with the request list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResult {
    /// Deterministic content address of the stored bytes.
    pub content_hash: String,
    /// Size of the uploaded artifact.
    pub size_bytes: u64,
    /// Resolvable URL on the public gateway.
    pub gateway_url: String,
    /// Provider-assigned timestamp.
    pub uploaded_at: DateTime<Utc>,
}

/// Content store backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Pinning API base URL (e.g. "https://pin.example.com").
    pub api_url: String,
    /// API key sent as a bearer token.
    pub api_key: String,
    /// Public gateway base URL used to build resolvable artifact links.
    pub gateway_url: String,
    /// Request timeout in seconds (default: 30).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
    /// Maximum accepted upload size in bytes (default: 10 MiB).
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_timeout() -> u32 {
    30
}

fn default_max_upload_bytes() -> usize {
    DEFAULT_MAX_UPLOAD_BYTES
}
