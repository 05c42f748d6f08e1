//! Lazy URL signing for video records.
//!
//! Records persist storage references, never signed URLs. Every read resolves them here so
//! the expiry window is measured from read time.

use std::sync::Arc;
use std::time::Duration;
use tubely_core::models::Video;
use tubely_storage::{Storage, StorageError, StorageReference};

#[derive(Clone)]
pub struct SigningService {
    storage: Arc<dyn Storage>,
    expiry: Duration,
}

impl SigningService {
    pub fn new(storage: Arc<dyn Storage>, expiry: Duration) -> Self {
        Self { storage, expiry }
    }

    /// Resolve one persisted reference into a retrieval URL.
    pub async fn sign_reference(&self, raw: &str) -> Result<String, StorageError> {
        let reference: StorageReference = raw.parse()?;
        self.storage.presigned_url(&reference, self.expiry).await
    }

    /// Replace the video and thumbnail references of a record with retrieval URLs.
    ///
    /// Null references are left as they are.
    pub async fn sign_video(&self, mut video: Video) -> Result<Video, StorageError> {
        if let Some(raw) = video.video_url.take() {
            video.video_url = Some(self.sign_reference(&raw).await?);
        }
        if let Some(raw) = video.thumbnail_url.take() {
            video.thumbnail_url = Some(self.sign_reference(&raw).await?);
        }
        Ok(video)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bytes::Bytes;
    use chrono::Utc;
    use tubely_storage::{StorageBackend, StorageResult};
    use uuid::Uuid;

    /// Signs by echoing the reference back in a recognisable URL.
    struct EchoSigner;

    #[async_trait]
    impl Storage for EchoSigner {
        async fn put(
            &self,
            key: &str,
            _data: Bytes,
            _content_type: &str,
        ) -> StorageResult<StorageReference> {
            Ok(StorageReference::object("tubely-videos".to_string(), key.to_string()))
        }

        async fn presigned_url(
            &self,
            reference: &StorageReference,
            expires_in: Duration,
        ) -> StorageResult<String> {
            Ok(match reference {
                StorageReference::Url(url) => url.clone(),
                StorageReference::Object { bucket, key } => format!(
                    "https://{}.s3.example.com/{}?expires={}",
                    bucket,
                    key,
                    expires_in.as_secs()
                ),
            })
        }

        async fn put_file(
            &self,
            key: &str,
            _path: &std::path::Path,
            content_type: &str,
        ) -> StorageResult<StorageReference> {
            self.put(key, Bytes::new(), content_type).await
        }

        fn backend_type(&self) -> StorageBackend {
            StorageBackend::S3
        }
    }

    fn video_with(video_url: Option<&str>, thumbnail_url: Option<&str>) -> Video {
        let now = Utc::now();
        Video {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "Boots".to_string(),
            description: String::new(),
            video_url: video_url.map(String::from),
            thumbnail_url: thumbnail_url.map(String::from),
            created_at: now,
            updated_at: now,
        }
    }

    fn signer() -> SigningService {
        SigningService::new(Arc::new(EchoSigner), Duration::from_secs(300))
    }

    #[tokio::test]
    async fn test_null_references_unchanged() {
        let video = video_with(None, None);
        let signed = signer().sign_video(video.clone()).await.unwrap();
        assert_eq!(signed, video);
    }

    #[tokio::test]
    async fn test_plain_url_unchanged() {
        let url = "http://localhost:8091/assets/landscape/abc.mp4";
        let signed = signer().sign_video(video_with(Some(url), None)).await.unwrap();
        assert_eq!(signed.video_url.as_deref(), Some(url));
    }

    #[tokio::test]
    async fn test_bucket_key_reference_is_signed_with_expiry() {
        let signed = signer()
            .sign_video(video_with(
                Some("tubely-videos,landscape/abc.mp4"),
                Some("tubely-videos,thumbnails/abc.png"),
            ))
            .await
            .unwrap();

        assert_eq!(
            signed.video_url.as_deref(),
            Some("https://tubely-videos.s3.example.com/landscape/abc.mp4?expires=300")
        );
        assert_eq!(
            signed.thumbnail_url.as_deref(),
            Some("https://tubely-videos.s3.example.com/thumbnails/abc.png?expires=300")
        );
    }

    #[tokio::test]
    async fn test_malformed_reference() {
        let result = signer()
            .sign_video(video_with(Some("no-comma-here"), None))
            .await;
        assert!(matches!(result, Err(StorageError::ReferenceMalformed(_))));
    }
}
