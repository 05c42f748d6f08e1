//! Video ingest orchestrator
//!
//! One upload runs through a fixed sequence of states:
//! `Received → Authorized → Validated → Staged → Inspected → Remuxed → Uploaded → Recorded`,
//! and `Responded` once the handler has signed the record. A failure stops the sequence and is
//! reported as an [`IngestError`] tagged with the last state reached. Local files are owned by
//! [`StagedFile`] guards, so every exit path removes them. Remote state is not rolled back: an
//! object uploaded before a later failure stays in the store, which is why the record update
//! comes last.

use axum::extract::Multipart;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tubely_core::models::Video;
use tubely_core::{AppError, MediaConfig};
use tubely_db::VideoRepository;
use tubely_processing::{
    asset_filename, AspectClass, MediaValidator, Remuxer, StagedFile, StagingArea, StreamProbe,
};
use tubely_storage::keys::video_key;
use tubely_storage::Storage;
use uuid::Uuid;

use super::authorize_owner;
use crate::constants::VIDEO_FIELD;
use crate::error::IntoAppError;
use crate::utils::upload::stage_field;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestStage {
    Received,
    Authorized,
    Validated,
    Staged,
    Inspected,
    Remuxed,
    Uploaded,
    Recorded,
    Responded,
}

impl IngestStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            IngestStage::Received => "received",
            IngestStage::Authorized => "authorized",
            IngestStage::Validated => "validated",
            IngestStage::Staged => "staged",
            IngestStage::Inspected => "inspected",
            IngestStage::Remuxed => "remuxed",
            IngestStage::Uploaded => "uploaded",
            IngestStage::Recorded => "recorded",
            IngestStage::Responded => "responded",
        }
    }
}

impl fmt::Display for IngestStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed ingest: the error plus the last state reached before it
#[derive(Debug, thiserror::Error)]
#[error("video ingest failed after {stage}: {source}")]
pub struct IngestError {
    pub stage: IngestStage,
    #[source]
    pub source: AppError,
}

impl IngestError {
    pub fn new(stage: IngestStage, source: impl IntoAppError) -> Self {
        Self {
            stage,
            source: source.into_app_error(),
        }
    }

    pub fn into_app_error(self) -> AppError {
        self.source
    }
}

/// `map_err` adapter tagging an error with the last state reached.
fn after<E: IntoAppError>(stage: IngestStage) -> impl FnOnce(E) -> IngestError {
    move |err| IngestError::new(stage, err)
}

/// The validated upload, staged on local disk
struct ReceivedUpload {
    media_type: String,
    filename: String,
    staged: StagedFile,
}

#[derive(Clone)]
pub struct VideoIngestService {
    validator: MediaValidator,
    staging: StagingArea,
    probe: Arc<dyn StreamProbe>,
    remuxer: Arc<dyn Remuxer>,
    storage: Arc<dyn Storage>,
    videos: Arc<dyn VideoRepository>,
}

impl VideoIngestService {
    pub fn new(
        media: &MediaConfig,
        probe: Arc<dyn StreamProbe>,
        remuxer: Arc<dyn Remuxer>,
        storage: Arc<dyn Storage>,
        videos: Arc<dyn VideoRepository>,
    ) -> Self {
        Self {
            validator: MediaValidator::new(
                media.max_video_size_bytes,
                media.video_allowed_content_types.clone(),
            ),
            staging: StagingArea::new(media.staging_dir.clone()),
            probe,
            remuxer,
            storage,
            videos,
        }
    }

    /// Run one upload through the pipeline and return the updated record.
    ///
    /// The record holds the persisted storage reference; signing is left to the caller.
    #[tracing::instrument(skip_all, fields(video_id = %video_id, user_id = %user_id))]
    pub async fn ingest(
        &self,
        user_id: Uuid,
        video_id: Uuid,
        mut multipart: Multipart,
    ) -> Result<Video, IngestError> {
        let start = std::time::Instant::now();

        authorize_owner(&self.videos, user_id, video_id)
            .await
            .map_err(after(IngestStage::Received))?;

        let upload = self.receive(&mut multipart).await?;

        let aspect = self.inspect(upload.staged.path()).await;

        let processed = self
            .remuxer
            .remux(upload.staged.path())
            .await
            .map_err(after(IngestStage::Inspected))?;
        // The original is no longer needed once the fast-start copy exists.
        drop(upload.staged);

        let key = video_key(aspect.as_str(), &upload.filename);
        let reference = self
            .storage
            .put_file(&key, processed.path(), &upload.media_type)
            .await
            .map_err(after(IngestStage::Remuxed))?;
        drop(processed);

        // Only the reference column is written, so a thumbnail stored meanwhile survives.
        let video = self
            .videos
            .set_video_url(video_id, &reference.to_string())
            .await
            .map_err(after(IngestStage::Uploaded))?;

        tracing::info!(
            key = %key,
            aspect = %aspect,
            duration_ms = start.elapsed().as_millis(),
            "Video ingested"
        );

        Ok(video)
    }

    /// Validate the `video` field's content type, then stream its body to a staged file.
    async fn receive(&self, multipart: &mut Multipart) -> Result<ReceivedUpload, IngestError> {
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(after(IngestStage::Authorized))?
        {
            if field.name() != Some(VIDEO_FIELD) {
                continue;
            }

            let media_type = self
                .validator
                .validate_content_type(field.content_type())
                .map_err(after(IngestStage::Authorized))?;
            let filename =
                asset_filename(&media_type, None).map_err(after(IngestStage::Authorized))?;

            let suffix = Path::new(&filename)
                .extension()
                .map(|ext| format!(".{}", ext.to_string_lossy()))
                .unwrap_or_default();
            let staged = stage_field(
                field,
                &self.staging,
                &suffix,
                self.validator.max_file_size(),
            )
            .await
            .map_err(after(IngestStage::Validated))?;

            return Ok(ReceivedUpload {
                media_type,
                filename,
                staged,
            });
        }

        Err(IngestError::new(
            IngestStage::Authorized,
            AppError::InvalidInput(format!("Missing multipart field '{}'", VIDEO_FIELD)),
        ))
    }

    /// Classify the staged video's aspect ratio.
    ///
    /// The class only picks a key prefix, so a failed probe degrades to `other`.
    async fn inspect(&self, path: &Path) -> AspectClass {
        match self.probe.probe(path).await {
            Ok(info) => info.aspect_class(),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    stage = %IngestStage::Staged,
                    "Video probe failed, classifying as other"
                );
                AspectClass::Other
            }
        }
    }
}
