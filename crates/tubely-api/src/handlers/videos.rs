//! Video record endpoints. References are signed on every read.

use crate::auth::AuthUser;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::upload::parse_video_id;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tubely_core::models::{CreateVideoParams, VideoResponse};
use tubely_core::AppError;
use utoipa::ToSchema;

const MAX_TITLE_LENGTH: usize = 255;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateVideoRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[utoipa::path(
    post,
    path = "/api/videos",
    tag = "videos",
    request_body = CreateVideoRequest,
    responses(
        (status = 201, description = "Draft video record created", body = VideoResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    )
)]
pub async fn create_video(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    payload: Result<Json<CreateVideoRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<VideoResponse>), HttpAppError> {
    let Json(request) = payload?;

    let title = request.title.trim();
    if title.is_empty() {
        return Err(AppError::InvalidInput("Title must not be empty".to_string()).into());
    }
    if title.len() > MAX_TITLE_LENGTH {
        return Err(AppError::InvalidInput(format!(
            "Title must be at most {} characters",
            MAX_TITLE_LENGTH
        ))
        .into());
    }

    let video = state
        .videos
        .create_video(CreateVideoParams {
            user_id: user.user_id,
            title: title.to_string(),
            description: request.description,
        })
        .await?;

    tracing::info!(video_id = %video.id, user_id = %user.user_id, "Video record created");

    Ok((StatusCode::CREATED, Json(video.into())))
}

#[utoipa::path(
    get,
    path = "/api/videos/{video_id}",
    tag = "videos",
    params(("video_id" = String, Path, description = "Video ID (UUID)")),
    responses(
        (status = 200, description = "Video record with signed URLs", body = VideoResponse),
        (status = 400, description = "Invalid video ID", body = ErrorResponse),
        (status = 401, description = "Missing token or not the owner", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse)
    )
)]
pub async fn get_video(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
    user: AuthUser,
) -> Result<Json<VideoResponse>, HttpAppError> {
    let video_id = parse_video_id(&video_id)?;

    let video = state
        .videos
        .get_video(video_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Video {} not found", video_id)))?;

    if !video.is_owned_by(user.user_id) {
        return Err(AppError::Forbidden("Not the owner of this video".to_string()).into());
    }

    let video = state.signer.sign_video(video).await?;
    Ok(Json(video.into()))
}

#[utoipa::path(
    get,
    path = "/api/videos",
    tag = "videos",
    responses(
        (status = 200, description = "The caller's videos, newest first", body = Vec<VideoResponse>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    )
)]
pub async fn list_videos(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<Vec<VideoResponse>>, HttpAppError> {
    let videos = state.videos.list_videos_for_user(user.user_id).await?;

    let mut responses = Vec::with_capacity(videos.len());
    for video in videos {
        responses.push(state.signer.sign_video(video).await?.into());
    }

    Ok(Json(responses))
}
