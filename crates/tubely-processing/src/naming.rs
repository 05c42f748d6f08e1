//! Asset naming.
//!
//! Without a caller-supplied identifier the name is 32 bytes from the thread-local CSPRNG,
//! base64url encoded, so keys can neither collide nor be guessed.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::RngCore;

use crate::validator::ValidationError;

const RANDOM_NAME_BYTES: usize = 32;

/// Build an asset filename `<name>.<ext>` for a canonical media type.
///
/// The extension is the media type's subtype (`video/mp4` -> `mp4`). `identifier`, when
/// given, becomes the name (thumbnails use the video ID); it must be URL-safe.
pub fn asset_filename(media_type: &str, identifier: Option<&str>) -> Result<String, ValidationError> {
    let ext = extension_for(media_type)?;

    let name = match identifier {
        Some(id) => {
            if id.is_empty()
                || !id
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
            {
                return Err(ValidationError::InvalidFilename(id.to_string()));
            }
            id.to_string()
        }
        None => random_name(),
    };

    Ok(format!("{}.{}", name, ext))
}

fn extension_for(media_type: &str) -> Result<&str, ValidationError> {
    let parts: Vec<&str> = media_type.split('/').collect();
    match parts.as_slice() {
        [kind, subtype] if !kind.is_empty() && !subtype.is_empty() => Ok(*subtype),
        _ => Err(ValidationError::UnsupportedMediaType {
            media_type: media_type.to_string(),
            allowed: Vec::new(),
        }),
    }
}

fn random_name() -> String {
    let mut bytes = [0u8; RANDOM_NAME_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
