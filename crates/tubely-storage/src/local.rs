use crate::keys::validate_key;
use crate::traits::{Storage, StorageError, StorageResult};
use crate::{StorageBackend, StorageReference};
use async_trait::async_trait;
use bytes::Bytes;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempPath;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem storage implementation
///
/// Objects are served by the API under `base_url`, so the persisted reference is a plain URL
/// and needs no signing.
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for file storage (e.g., "/var/lib/tubely/assets")
    /// * `base_url` - Base URL for serving files (e.g., "http://localhost:8091/assets")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            base_url,
        })
    }

    fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        validate_key(storage_key)?;
        Ok(self.base_path.join(storage_key))
    }

    fn generate_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }

    /// A uniquely named sibling of `path`, removed on drop unless persisted.
    ///
    /// Concurrent writers of one key each get their own file, so a rename only ever moves a
    /// complete object into place.
    async fn partial_file(path: &Path) -> io::Result<TempPath> {
        let parent = path
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| io::Error::other(format!("{} has no parent", path.display())))?;
        fs::create_dir_all(&parent).await?;

        let named = tokio::task::spawn_blocking(move || {
            tempfile::Builder::new()
                .prefix(".partial-")
                .tempfile_in(parent)
        })
        .await
        .map_err(io::Error::other)??;

        Ok(named.into_temp_path())
    }

    /// Fill a partial file with `write`, then rename it over `path`.
    async fn write_atomically<F, Fut>(&self, path: &Path, write: F) -> StorageResult<u64>
    where
        F: FnOnce(PathBuf) -> Fut,
        Fut: std::future::Future<Output = io::Result<u64>>,
    {
        let result = async {
            let partial = Self::partial_file(path).await?;
            let size = write(partial.to_path_buf()).await?;
            partial.persist(path).map_err(|e| e.error)?;
            Ok::<_, io::Error>(size)
        }
        .await;

        result.map_err(|e| {
            StorageError::StoreUnavailable(format!(
                "Failed to write file {}: {}",
                path.display(),
                e
            ))
        })
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn put(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<StorageReference> {
        let path = self.key_to_path(key)?;
        let start = std::time::Instant::now();

        let size = self
            .write_atomically(&path, |partial| async move {
                let mut file = fs::File::create(&partial).await?;
                file.write_all(&data).await?;
                file.sync_all().await?;
                Ok(data.len() as u64)
            })
            .await?;

        tracing::info!(
            key = %key,
            path = %path.display(),
            size_bytes = size,
            content_type = %content_type,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local upload successful"
        );

        Ok(StorageReference::Url(self.generate_url(key)))
    }

    async fn put_file(
        &self,
        key: &str,
        source: &Path,
        content_type: &str,
    ) -> StorageResult<StorageReference> {
        let path = self.key_to_path(key)?;
        let start = std::time::Instant::now();

        let size = self
            .write_atomically(&path, |partial| async move {
                let size = fs::copy(source, &partial).await?;
                fs::File::open(&partial).await?.sync_all().await?;
                Ok(size)
            })
            .await?;

        tracing::info!(
            key = %key,
            path = %path.display(),
            size_bytes = size,
            content_type = %content_type,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local upload successful"
        );

        Ok(StorageReference::Url(self.generate_url(key)))
    }

    async fn presigned_url(
        &self,
        reference: &StorageReference,
        _expires_in: Duration,
    ) -> StorageResult<String> {
        match reference {
            StorageReference::Url(url) => Ok(url.clone()),
            StorageReference::Object { bucket, key } => Err(StorageError::ConfigError(format!(
                "Cannot sign bucket reference '{}' ({}) with local storage",
                bucket, key
            ))),
        }
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
