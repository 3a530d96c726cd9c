//! PDF metadata stripping and flat re-serialization.

use lopdf::{Document, Object};
use tracing::debug;

use super::types::Artifact;

/// Descriptive Info-dictionary keys dropped during compression. Structural
/// keys (dates, trapping) stay untouched.
const METADATA_KEYS: [&[u8]; 6] = [
    b"Title",
    b"Author",
    b"Subject",
    b"Keywords",
    b"Producer",
    b"Creator",
];

/// Strip descriptive metadata and re-serialize the document flatly.
///
/// Compression failures are non-fatal: on any parse or serialization error
/// the original bytes come back unchanged. The result is only used when it
/// is actually smaller than the input.
pub fn compress_document(artifact: Artifact) -> Artifact {
    let original_len = artifact.bytes.len();

    let reserialized = match strip_and_save(&artifact.bytes) {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!("pdf re-serialization failed, keeping original bytes: {}", e);
            return artifact;
        }
    };

    if reserialized.len() < original_len {
        debug!(
            from = original_len,
            to = reserialized.len(),
            "pdf artifact re-serialized"
        );
        Artifact::new(reserialized, artifact.mime)
    } else {
        artifact
    }
}

fn strip_and_save(bytes: &[u8]) -> Result<Vec<u8>, lopdf::Error> {
    let mut doc = Document::load_mem(bytes)?;

    let info_id = doc
        .trailer
        .get(b"Info")
        .ok()
        .and_then(|obj| obj.as_reference().ok());

    if let Some(id) = info_id {
        if let Ok(Object::Dictionary(info)) = doc.get_object_mut(id) {
            for key in METADATA_KEYS {
                info.remove(key);
            }
        }
    }

    let mut out = Vec::new();
    doc.save_to(&mut out)?;
    Ok(out)
}
