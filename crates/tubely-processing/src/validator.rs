/// Validation errors for uploaded media
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// Content-Type header missing or not a parseable media type
    #[error("Invalid content type '{content_type}': {reason}")]
    InvalidContentType {
        content_type: String,
        reason: String,
    },

    #[error("Unsupported media type: {media_type} (allowed: {allowed:?})")]
    UnsupportedMediaType {
        media_type: String,
        allowed: Vec<String>,
    },

    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: usize, max: usize },

    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    #[error("Empty file")]
    EmptyFile,
}

/// Media file validator
///
/// Gatekeeper for uploads: runs before anything is written to disk or storage.
#[derive(Debug, Clone)]
pub struct MediaValidator {
    max_file_size: usize,
    allowed_content_types: Vec<String>,
}

impl MediaValidator {
    pub fn new(max_file_size: usize, allowed_content_types: Vec<String>) -> Self {
        Self {
            max_file_size,
            allowed_content_types: allowed_content_types
                .into_iter()
                .map(|ct| ct.trim().to_lowercase())
                .collect(),
        }
    }

    pub fn max_file_size(&self) -> usize {
        self.max_file_size
    }

    /// Parse a raw Content-Type header value, strip its parameters and check it against the
    /// allow-list. Returns the canonical `type/subtype` on success.
    pub fn validate_content_type(&self, header: Option<&str>) -> Result<String, ValidationError> {
        let raw = header.map(str::trim).unwrap_or_default();
        if raw.is_empty() {
            return Err(ValidationError::InvalidContentType {
                content_type: String::new(),
                reason: "missing Content-Type".to_string(),
            });
        }

        let parsed: mime::Mime = raw
            .parse()
            .map_err(|e: mime::FromStrError| ValidationError::InvalidContentType {
                content_type: raw.to_string(),
                reason: e.to_string(),
            })?;

        let media_type = parsed.essence_str().to_lowercase();
        if !self.allowed_content_types.iter().any(|ct| ct == &media_type) {
            return Err(ValidationError::UnsupportedMediaType {
                media_type,
                allowed: self.allowed_content_types.clone(),
            });
        }

        Ok(media_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video_validator() -> MediaValidator {
        MediaValidator::new(1 << 30, vec!["video/mp4".to_string()])
    }

    fn thumbnail_validator() -> MediaValidator {
        MediaValidator::new(
            10 << 20,
            vec!["image/jpeg".to_string(), "image/png".to_string()],
        )
    }

    #[test]
    fn test_permitted_types_returned_unchanged() {
        let validator = thumbnail_validator();
        for ct in ["image/jpeg", "image/png"] {
            assert_eq!(validator.validate_content_type(Some(ct)).unwrap(), ct);
        }
        assert_eq!(
            video_validator()
                .validate_content_type(Some("video/mp4"))
                .unwrap(),
            "video/mp4"
        );
    }

    #[test]
    fn test_parameters_are_stripped() {
        let media_type = video_validator()
            .validate_content_type(Some("video/mp4; codecs=\"avc1.42E01E\""))
            .unwrap();
        assert_eq!(media_type, "video/mp4");
    }

    #[test]
    fn test_case_is_normalized() {
        let media_type = video_validator()
            .validate_content_type(Some("Video/MP4"))
            .unwrap();
        assert_eq!(media_type, "video/mp4");
    }

    #[test]
    fn test_gif_rejected_by_thumbnail_allow_list() {
        let result = thumbnail_validator().validate_content_type(Some("image/gif"));
        match result {
            Err(ValidationError::UnsupportedMediaType { media_type, allowed }) => {
                assert_eq!(media_type, "image/gif");
                assert_eq!(allowed, vec!["image/jpeg", "image/png"]);
            }
            other => panic!("Expected UnsupportedMediaType, got {:?}", other),
        }
    }

    #[test]
    fn test_types_outside_allow_list_rejected() {
        let validator = video_validator();
        for ct in ["video/webm", "video/quicktime", "application/octet-stream", "text/html"] {
            assert!(matches!(
                validator.validate_content_type(Some(ct)),
                Err(ValidationError::UnsupportedMediaType { .. })
            ));
        }
    }

    #[test]
    fn test_missing_or_malformed_header() {
        let validator = video_validator();
        for header in [None, Some(""), Some("   "), Some("video"), Some("/mp4")] {
            assert!(
                matches!(
                    validator.validate_content_type(header),
                    Err(ValidationError::InvalidContentType { .. })
                ),
                "expected {:?} to be malformed",
                header
            );
        }
    }
}
