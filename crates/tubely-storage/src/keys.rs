//! Shared key composition for storage backends.

use crate::{StorageError, StorageResult};

/// Prefix under which thumbnails are stored.
pub const THUMBNAIL_PREFIX: &str = "thumbnails";

/// Key for an ingested video: `{aspect}/{filename}`.
pub fn video_key(aspect: &str, filename: &str) -> String {
    format!("{}/{}", aspect, filename)
}

/// Key for a thumbnail: `thumbnails/{filename}`.
pub fn thumbnail_key(filename: &str) -> String {
    format!("{}/{}", THUMBNAIL_PREFIX, filename)
}

/// Reject keys that could escape the bucket or storage root.
pub fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty() || key.contains("..") || key.starts_with('/') || key.contains('\\') {
        return Err(StorageError::InvalidKey(format!(
            "Storage key contains invalid characters: {}",
            key
        )));
    }
    Ok(())
}
