//! Upload pipelines: the video ingest orchestrator and the thumbnail upload.

mod thumbnail;
mod video_ingest;

pub use thumbnail::ThumbnailService;
pub use video_ingest::{IngestError, IngestStage, VideoIngestService};

use std::sync::Arc;
use tubely_core::AppError;
use tubely_db::VideoRepository;
use uuid::Uuid;

/// Load a video record and check that `user_id` owns it.
///
/// Runs before any part of the upload body is read.
pub(crate) async fn authorize_owner(
    videos: &Arc<dyn VideoRepository>,
    user_id: Uuid,
    video_id: Uuid,
) -> Result<(), AppError> {
    let video = videos
        .get_video(video_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Video {} not found", video_id)))?;

    if !video.is_owned_by(user_id) {
        return Err(AppError::Forbidden(
            "Not the owner of this video".to_string(),
        ));
    }
    Ok(())
}
