//! In-memory stand-in for the S3 backend.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tubely_storage::keys::validate_key;
use tubely_storage::{Storage, StorageBackend, StorageError, StorageReference, StorageResult};

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub data: Bytes,
    pub content_type: String,
}

pub struct MemoryObjectStore {
    bucket: String,
    objects: Mutex<HashMap<String, StoredObject>>,
    reject_puts: AtomicBool,
}

impl MemoryObjectStore {
    pub fn new(bucket: &str) -> Self {
        Self {
            bucket: bucket.to_string(),
            objects: Mutex::new(HashMap::new()),
            reject_puts: AtomicBool::new(false),
        }
    }

    /// Make every subsequent put fail as if the bucket were unreachable.
    pub fn reject_puts(&self) {
        self.reject_puts.store(true, Ordering::SeqCst);
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.objects.lock().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn object(&self, key: &str) -> Option<StoredObject> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    /// URL the fake signer produces for `key`.
    pub fn signed_url(&self, key: &str, expires_in_secs: u64) -> String {
        format!(
            "https://{}.s3.test/{}?X-Amz-Expires={}",
            self.bucket, key, expires_in_secs
        )
    }
}

#[async_trait]
impl Storage for MemoryObjectStore {
    async fn put(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<StorageReference> {
        validate_key(key)?;
        if self.reject_puts.load(Ordering::SeqCst) {
            return Err(StorageError::StoreUnavailable(
                "connection refused".to_string(),
            ));
        }
        self.objects.lock().unwrap().insert(
            key.to_string(),
            StoredObject {
                data,
                content_type: content_type.to_string(),
            },
        );
        Ok(StorageReference::object(self.bucket.clone(), key.to_string()))
    }

    async fn presigned_url(
        &self,
        reference: &StorageReference,
        expires_in: Duration,
    ) -> StorageResult<String> {
        Ok(match reference {
            StorageReference::Url(url) => url.clone(),
            StorageReference::Object { key, .. } => self.signed_url(key, expires_in.as_secs()),
        })
    }

    async fn put_file(
        &self,
        key: &str,
        path: &Path,
        content_type: &str,
    ) -> StorageResult<StorageReference> {
        let data = tokio::fs::read(path)
            .await
            .map_err(|e| StorageError::StoreUnavailable(e.to_string()))?;
        self.put(key, Bytes::from(data), content_type).await
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}
