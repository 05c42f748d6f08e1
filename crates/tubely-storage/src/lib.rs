//! Tubely Storage Library
//!
//! Storage abstraction and implementations for S3 (via `object_store`) and the local
//! filesystem.
//!
//! # Storage key format
//!
//! - **Videos**: `{aspect}/{asset filename}`, where aspect is `portrait`, `landscape` or `other`
//! - **Thumbnails**: `thumbnails/{asset filename}`
//!
//! Keys must not contain `..` or a leading `/`. Key composition lives in the `keys` module.
//!
//! # Persisted references
//!
//! Uploads return a [`StorageReference`]. S3 uploads persist as `"<bucket>,<key>"` and are
//! signed when read back; local uploads persist as a plain URL.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
pub mod reference;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use reference::StorageReference;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
pub use tubely_core::StorageBackend;
