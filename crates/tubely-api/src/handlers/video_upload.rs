use crate::auth::AuthUser;
use crate::error::{ErrorResponse, HttpAppError};
use crate::services::IngestStage;
use crate::state::AppState;
use crate::utils::upload::parse_video_id;
use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use std::sync::Arc;
use tubely_core::models::VideoResponse;
use tubely_core::ErrorMetadata;

#[utoipa::path(
    post,
    path = "/api/video_upload/{video_id}",
    tag = "uploads",
    params(("video_id" = String, Path, description = "Video ID (UUID)")),
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "Field `video`: an MP4 file"),
    responses(
        (status = 200, description = "Video processed and stored", body = VideoResponse),
        (status = 400, description = "Invalid video ID or content type", body = ErrorResponse),
        (status = 401, description = "Missing token or not the owner", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Processing or storage failure", body = ErrorResponse)
    )
)]
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
    user: AuthUser,
    multipart: Multipart,
) -> Result<Json<VideoResponse>, HttpAppError> {
    let video_id = parse_video_id(&video_id)?;

    let video = state
        .ingest
        .ingest(user.user_id, video_id, multipart)
        .await
        .map_err(|e| {
            if e.source.http_status_code() >= 500 {
                tracing::warn!(video_id = %video_id, stage = %e.stage, error = %e.source, "Video ingest failed");
            } else {
                tracing::debug!(video_id = %video_id, stage = %e.stage, error = %e.source, "Video ingest rejected");
            }
            HttpAppError(e.into_app_error())
        })?;

    let video = state.signer.sign_video(video).await?;
    tracing::debug!(video_id = %video_id, stage = %IngestStage::Responded, "Video ingest complete");

    Ok(Json(video.into()))
}
