//! Artifact size normalization.
//!
//! Certificates come out of the renderer at whatever size the template
//! produces; the content store and mail providers care about bytes. The
//! compressor squeezes an artifact toward a byte target before upload.
//!
//! Compression is a pure function over bytes and is deliberately
//! infallible: every failure path returns the input unchanged, and the
//! output is never larger than the input.

mod document;
mod raster;
mod types;

pub use types::{Artifact, ArtifactMime, CompressorConfig, DEFAULT_TARGET_BYTES};

/// Compress an artifact toward `config.target_bytes`.
///
/// Artifacts already at or under target are returned byte-identical.
/// Raster images go through a JPEG quality-descent loop; PDFs get their
/// descriptive metadata stripped and are re-serialized flatly.
pub fn compress(artifact: Artifact, config: &CompressorConfig) -> Artifact {
    if artifact.bytes.len() <= config.target_bytes {
        return artifact;
    }

    if artifact.mime.is_raster() {
        raster::compress_raster(artifact, config)
    } else {
        document::compress_document(artifact)
    }
}
