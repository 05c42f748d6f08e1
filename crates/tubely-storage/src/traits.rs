//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::{StorageBackend, StorageReference};
use async_trait::async_trait;
use bytes::Bytes;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Transport or authentication failure talking to the backend
    #[error("Object store unavailable: {0}")]
    StoreUnavailable(String),

    /// A persisted reference that cannot be decomposed into bucket and key
    #[error("Malformed storage reference: {0}")]
    ReferenceMalformed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage abstraction trait
///
/// All storage backends (S3, local filesystem) implement this trait so the upload services
/// never couple to a specific backend.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Store `data` under `key` as a single object and return the reference to persist.
    ///
    /// The write is all-or-nothing: a failed put never leaves a readable object at `key`.
    async fn put(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<StorageReference>;

    /// Stream the contents of a local file to `key` without loading it into memory.
    ///
    /// Same all-or-nothing guarantee as [`Storage::put`].
    async fn put_file(
        &self,
        key: &str,
        path: &Path,
        content_type: &str,
    ) -> StorageResult<StorageReference>;

    /// Resolve a persisted reference into a retrieval URL valid for `expires_in`.
    ///
    /// Plain URL references are returned unchanged.
    async fn presigned_url(
        &self,
        reference: &StorageReference,
        expires_in: Duration,
    ) -> StorageResult<String>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
