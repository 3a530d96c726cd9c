//! Quality-descent re-encoding for raster artifacts.

use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use tracing::debug;

use super::types::{Artifact, ArtifactMime, CompressorConfig};

/// Re-encode a raster image as JPEG, walking the quality down from
/// `start_quality` in `quality_step` decrements until the output fits the
/// target or the floor is reached.
///
/// Returns the smallest encoding seen, even if it is still above target.
/// If decoding fails or no encoding beats the original, the input artifact
/// is returned unchanged.
pub fn compress_raster(artifact: Artifact, config: &CompressorConfig) -> Artifact {
    let original_len = artifact.bytes.len();

    let decoded = match image::load_from_memory(&artifact.bytes) {
        Ok(img) => img,
        Err(e) => {
            debug!("raster decode failed, keeping original bytes: {}", e);
            return artifact;
        }
    };

    let mut best: Option<Vec<u8>> = None;
    let mut quality = config.start_quality;

    loop {
        match encode_jpeg(&decoded, quality) {
            Ok(encoded) => {
                let is_better = best.as_ref().map_or(true, |b| encoded.len() < b.len());
                if is_better {
                    best = Some(encoded);
                }
            }
            Err(e) => {
                debug!(quality, "jpeg encode pass failed: {}", e);
            }
        }

        let fits = best
            .as_ref()
            .is_some_and(|b| b.len() <= config.target_bytes);
        if fits || quality <= config.min_quality {
            break;
        }
        quality = quality
            .saturating_sub(config.quality_step)
            .max(config.min_quality);
    }

    match best {
        Some(bytes) if bytes.len() < original_len => {
            debug!(
                from = original_len,
                to = bytes.len(),
                final_quality = quality,
                "raster artifact re-encoded"
            );
            Artifact::new(bytes, ArtifactMime::Jpeg)
        }
        _ => artifact,
    }
}

fn encode_jpeg(image: &DynamicImage, quality: u8) -> Result<Vec<u8>, image::ImageError> {
    // JPEG has no alpha channel; flatten before encoding.
    let rgb = image.to_rgb8();
    let mut out = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut out, quality);
    encoder.encode_image(&rgb)?;
    Ok(out)
}
