//! Common utilities for file upload handlers

use axum::extract::multipart::Field;
use bytes::{Bytes, BytesMut};
use tokio::io::AsyncWriteExt;
use tubely_core::AppError;
use tubely_processing::{StagedFile, StagingArea, ValidationError};
use uuid::Uuid;

use crate::error::IntoAppError;

/// Parse the `videoID` path segment.
pub fn parse_video_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| AppError::InvalidInput(format!("Invalid video ID: {}", raw)))
}

/// Stream a multipart field to a new staged file, chunk by chunk.
///
/// Fails with `FileTooLarge` as soon as more than `max_size` bytes arrive; the partially
/// written file is removed when the returned error drops the guard.
pub async fn stage_field(
    mut field: Field<'_>,
    staging: &StagingArea,
    suffix: &str,
    max_size: usize,
) -> Result<StagedFile, AppError> {
    let (staged, mut file) = staging.create(suffix).await?;

    let mut written: usize = 0;
    while let Some(chunk) = field.chunk().await.map_err(IntoAppError::into_app_error)? {
        written += chunk.len();
        if written > max_size {
            return Err(ValidationError::FileTooLarge {
                size: written,
                max: max_size,
            }
            .into_app_error());
        }
        file.write_all(&chunk).await?;
    }
    file.flush().await?;

    if written == 0 {
        return Err(ValidationError::EmptyFile.into_app_error());
    }

    tracing::debug!(
        path = %staged.path().display(),
        size_bytes = written,
        "Upload staged to local disk"
    );
    Ok(staged)
}

/// Read a small multipart field fully into memory, enforcing `max_size`.
pub async fn read_field(mut field: Field<'_>, max_size: usize) -> Result<Bytes, AppError> {
    let mut buf = BytesMut::new();
    while let Some(chunk) = field.chunk().await.map_err(IntoAppError::into_app_error)? {
        if buf.len() + chunk.len() > max_size {
            return Err(ValidationError::FileTooLarge {
                size: buf.len() + chunk.len(),
                max: max_size,
            }
            .into_app_error());
        }
        buf.extend_from_slice(&chunk);
    }

    if buf.is_empty() {
        return Err(ValidationError::EmptyFile.into_app_error());
    }
    Ok(buf.freeze())
}
