//! Persisted storage references.
//!
//! A video record stores where its object lives as a single string. S3 objects are written
//! as `"<bucket>,<key>"`; the local backend writes a plain `http(s)://` URL.

use crate::StorageError;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageReference {
    Object { bucket: String, key: String },
    Url(String),
}

impl StorageReference {
    pub fn object(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        StorageReference::Object {
            bucket: bucket.into(),
            key: key.into(),
        }
    }
}

impl Display for StorageReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            StorageReference::Object { bucket, key } => write!(f, "{},{}", bucket, key),
            StorageReference::Url(url) => write!(f, "{}", url),
        }
    }
}

impl FromStr for StorageReference {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.contains(',') && (s.starts_with("http://") || s.starts_with("https://")) {
            return Ok(StorageReference::Url(s.to_string()));
        }

        let parts: Vec<&str> = s.split(',').collect();
        match parts.as_slice() {
            [bucket, key] if !bucket.is_empty() && !key.is_empty() => {
                Ok(StorageReference::object(*bucket, *key))
            }
            _ => Err(StorageError::ReferenceMalformed(format!(
                "video URL not in the format 'bucket,key': {}",
                s
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_key_round_trip() {
        let reference = StorageReference::object("tubely-videos", "landscape/Zm9v.mp4");
        let persisted = reference.to_string();
        assert_eq!(persisted, "tubely-videos,landscape/Zm9v.mp4");

        match persisted.parse::<StorageReference>().unwrap() {
            StorageReference::Object { bucket, key } => {
                assert_eq!(bucket, "tubely-videos");
                assert_eq!(key, "landscape/Zm9v.mp4");
            }
            other => panic!("Expected object reference, got {:?}", other),
        }
    }

    #[test]
    fn test_plain_url_reference() {
        let url = "http://localhost:8091/assets/portrait/abc.mp4";
        let reference: StorageReference = url.parse().unwrap();
        assert_eq!(reference, StorageReference::Url(url.to_string()));
        assert_eq!(reference.to_string(), url);
    }

    #[test]
    fn test_malformed_references_rejected() {
        for raw in ["", "no-comma-key", "a,b,c", ",key", "bucket,"] {
            let result = raw.parse::<StorageReference>();
            assert!(
                matches!(result, Err(StorageError::ReferenceMalformed(_))),
                "expected {:?} to be rejected",
                raw
            );
        }
    }
}
