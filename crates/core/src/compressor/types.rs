//! Types for the artifact compressor.

use serde::{Deserialize, Serialize};

/// Default size target for generated artifacts: 200 KiB.
pub const DEFAULT_TARGET_BYTES: usize = 200 * 1024;

/// Media type of a certificate artifact.
///
/// The pipeline only ever produces and uploads these three types; anything
/// else is rejected before it reaches the content store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactMime {
    Jpeg,
    Png,
    Pdf,
}

impl ArtifactMime {
    /// The full MIME type string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Pdf => "application/pdf",
        }
    }

    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Pdf => "pdf",
        }
    }

    /// Whether this is a raster image type.
    pub fn is_raster(&self) -> bool {
        matches!(self, Self::Jpeg | Self::Png)
    }
}

impl std::fmt::Display for ArtifactMime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rendered certificate artifact, owned by one pipeline run and discarded
/// after upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub bytes: Vec<u8>,
    pub mime: ArtifactMime,
}

impl Artifact {
    pub fn new(bytes: Vec<u8>, mime: ArtifactMime) -> Self {
        Self { bytes, mime }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Quality-descent parameters for raster re-encoding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressorConfig {
    /// Size the compressor aims for (bytes).
    #[serde(default = "default_target_bytes")]
    pub target_bytes: usize,
    /// Starting JPEG quality (percent).
    #[serde(default = "default_start_quality")]
    pub start_quality: u8,
    /// Quality decrement per iteration (percentage points).
    #[serde(default = "default_quality_step")]
    pub quality_step: u8,
    /// Quality floor; the loop never encodes below this.
    #[serde(default = "default_min_quality")]
    pub min_quality: u8,
}

impl Default for CompressorConfig {
    fn default() -> Self {
        Self {
            target_bytes: default_target_bytes(),
            start_quality: default_start_quality(),
            quality_step: default_quality_step(),
            min_quality: default_min_quality(),
        }
    }
}

fn default_target_bytes() -> usize {
    DEFAULT_TARGET_BYTES
}

fn default_start_quality() -> u8 {
    85
}

fn default_quality_step() -> u8 {
    5
}

fn default_min_quality() -> u8 {
    20
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_strings() {
        assert_eq!(ArtifactMime::Jpeg.as_str(), "image/jpeg");
        assert_eq!(ArtifactMime::Png.as_str(), "image/png");
        assert_eq!(ArtifactMime::Pdf.as_str(), "application/pdf");
        assert_eq!(ArtifactMime::Pdf.extension(), "pdf");
    }

    #[test]
    fn test_mime_is_raster() {
        assert!(ArtifactMime::Jpeg.is_raster());
        assert!(ArtifactMime::Png.is_raster());
        assert!(!ArtifactMime::Pdf.is_raster());
    }

    #[test]
    fn test_config_defaults() {
        let config = CompressorConfig::default();
        assert_eq!(config.target_bytes, 200 * 1024);
        assert_eq!(config.start_quality, 85);
        assert_eq!(config.quality_step, 5);
        assert_eq!(config.min_quality, 20);
    }
}
