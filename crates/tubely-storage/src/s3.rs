use crate::keys::validate_key;
use crate::traits::{Storage, StorageError, StorageResult};
use crate::{StorageBackend, StorageReference};
use async_trait::async_trait;
use bytes::Bytes;
use http::Method;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::signer::Signer;
use object_store::{
    Attribute, AttributeValue, Attributes, ObjectStore, PutMultipartOptions, PutOptions,
    PutPayload, Result as ObjectResult, WriteMultipart,
};
use std::time::Duration;
use tokio::io::AsyncReadExt;

/// Bytes read from the source file per iteration.
const READ_BUFFER_BYTES: usize = 1024 * 1024;
/// Parts allowed in flight before reading more of the source file.
const MAX_CONCURRENT_PARTS: usize = 4;

fn content_type_attributes(content_type: &str) -> Attributes {
    let mut attributes = Attributes::new();
    attributes.insert(
        Attribute::ContentType,
        AttributeValue::from(content_type.to_string()),
    );
    attributes
}

fn unavailable(e: impl std::fmt::Display) -> StorageError {
    StorageError::StoreUnavailable(e.to_string())
}

/// Stream `source` into `location` as a multipart upload.
///
/// At most [`MAX_CONCURRENT_PARTS`] parts plus one read buffer are held in memory. The upload is
/// aborted on any failure, so no partial object becomes visible.
async fn stream_file(
    store: &dyn ObjectStore,
    location: &Path,
    source: &std::path::Path,
    content_type: &str,
) -> StorageResult<u64> {
    let mut file = tokio::fs::File::open(source)
        .await
        .map_err(unavailable)?;
    let upload = store
        .put_multipart_opts(
            location,
            PutMultipartOptions::from(content_type_attributes(content_type)),
        )
        .await
        .map_err(unavailable)?;
    let mut writer = WriteMultipart::new(upload);

    let mut buffer = vec![0u8; READ_BUFFER_BYTES];
    let mut size = 0u64;
    let copied: StorageResult<()> = async {
        loop {
            let read = file.read(&mut buffer).await.map_err(unavailable)?;
            if read == 0 {
                return Ok(());
            }
            writer
                .wait_for_capacity(MAX_CONCURRENT_PARTS)
                .await
                .map_err(unavailable)?;
            writer.write(&buffer[..read]);
            size += read as u64;
        }
    }
    .await;

    if let Err(e) = copied {
        if let Err(abort_error) = writer.abort().await {
            tracing::warn!(error = %abort_error, "Failed to abort multipart upload");
        }
        return Err(e);
    }

    writer.finish().await.map_err(unavailable)?;
    Ok(size)
}

/// S3 storage implementation
#[derive(Clone)]
pub struct S3Storage {
    store: AmazonS3,
    bucket: String,
    region: String,
    endpoint_url: Option<String>, // Custom endpoint for S3-compatible providers
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    pub fn new(bucket: String, region: String, endpoint_url: Option<String>) -> StorageResult<Self> {
        let store = Self::build_store(&bucket, &region, endpoint_url.as_deref())?;

        Ok(S3Storage {
            store,
            bucket,
            region,
            endpoint_url,
        })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    fn build_store(bucket: &str, region: &str, endpoint: Option<&str>) -> StorageResult<AmazonS3> {
        // Credentials come from the standard AWS environment variables.
        let mut builder = AmazonS3Builder::from_env()
            .with_region(region)
            .with_bucket_name(bucket);

        if let Some(endpoint) = endpoint {
            let allow_http = endpoint.starts_with("http://");
            builder = builder.with_endpoint(endpoint).with_allow_http(allow_http);
        }

        builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))
    }

    /// Signer for `bucket`; references written by an older deployment may name another bucket.
    fn signer_for(&self, bucket: &str) -> StorageResult<AmazonS3> {
        if bucket == self.bucket {
            Ok(self.store.clone())
        } else {
            Self::build_store(bucket, &self.region, self.endpoint_url.as_deref())
        }
    }
}

#[async_trait]
impl Storage for S3Storage {
    async fn put(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<StorageReference> {
        validate_key(key)?;
        let size = data.len() as u64;
        let location = Path::from(key.to_string());

        let options = PutOptions {
            attributes: content_type_attributes(content_type),
            ..Default::default()
        };

        let start = std::time::Instant::now();

        let result: ObjectResult<_> = self
            .store
            .put_opts(&location, PutPayload::from(data), options)
            .await;

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 upload failed"
            );
            StorageError::StoreUnavailable(e.to_string())
        })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            size_bytes = size,
            content_type = %content_type,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(StorageReference::object(self.bucket.clone(), key))
    }

    async fn put_file(
        &self,
        key: &str,
        source: &std::path::Path,
        content_type: &str,
    ) -> StorageResult<StorageReference> {
        validate_key(key)?;
        let location = Path::from(key.to_string());
        let start = std::time::Instant::now();

        let size = stream_file(&self.store, &location, source, content_type)
            .await
            .inspect_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 multipart upload failed"
                );
            })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            size_bytes = size,
            content_type = %content_type,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 multipart upload successful"
        );

        Ok(StorageReference::object(self.bucket.clone(), key))
    }

    async fn presigned_url(
        &self,
        reference: &StorageReference,
        expires_in: Duration,
    ) -> StorageResult<String> {
        let (bucket, key) = match reference {
            StorageReference::Url(url) => return Ok(url.clone()),
            StorageReference::Object { bucket, key } => (bucket, key),
        };

        let signer = self.signer_for(bucket)?;
        let location = Path::from(key.clone());
        let url_result: ObjectResult<_> = signer
            .signed_url(Method::GET, &location, expires_in)
            .await;

        let url = url_result
            .map_err(|e| StorageError::StoreUnavailable(e.to_string()))?
            .to_string();

        tracing::debug!(
            bucket = %bucket,
            key = %key,
            expires_in_secs = expires_in.as_secs(),
            "Presigned GET URL generated"
        );

        Ok(url)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}
