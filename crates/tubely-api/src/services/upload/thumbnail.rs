//! Thumbnail upload
//!
//! A single validated put with no processing. The video ID names the object, so a new
//! thumbnail replaces the previous one of the same type.

use axum::extract::Multipart;
use std::sync::Arc;
use tubely_core::models::Video;
use tubely_core::{AppError, MediaConfig};
use tubely_db::VideoRepository;
use tubely_processing::{asset_filename, MediaValidator};
use tubely_storage::keys::thumbnail_key;
use tubely_storage::Storage;
use uuid::Uuid;

use super::authorize_owner;
use crate::constants::THUMBNAIL_FIELD;
use crate::error::IntoAppError;
use crate::utils::upload::read_field;

#[derive(Clone)]
pub struct ThumbnailService {
    validator: MediaValidator,
    storage: Arc<dyn Storage>,
    videos: Arc<dyn VideoRepository>,
}

impl ThumbnailService {
    pub fn new(
        media: &MediaConfig,
        storage: Arc<dyn Storage>,
        videos: Arc<dyn VideoRepository>,
    ) -> Self {
        Self {
            validator: MediaValidator::new(
                media.max_thumbnail_size_bytes,
                media.thumbnail_allowed_content_types.clone(),
            ),
            storage,
            videos,
        }
    }

    #[tracing::instrument(skip_all, fields(video_id = %video_id, user_id = %user_id))]
    pub async fn upload(
        &self,
        user_id: Uuid,
        video_id: Uuid,
        mut multipart: Multipart,
    ) -> Result<Video, AppError> {
        authorize_owner(&self.videos, user_id, video_id).await?;

        let (media_type, data) = loop {
            let field = multipart
                .next_field()
                .await
                .map_err(IntoAppError::into_app_error)?
                .ok_or_else(|| {
                    AppError::InvalidInput(format!(
                        "Missing multipart field '{}'",
                        THUMBNAIL_FIELD
                    ))
                })?;
            if field.name() != Some(THUMBNAIL_FIELD) {
                continue;
            }

            let media_type = self
                .validator
                .validate_content_type(field.content_type())
                .map_err(IntoAppError::into_app_error)?;
            let data = read_field(field, self.validator.max_file_size()).await?;
            break (media_type, data);
        };

        let filename = asset_filename(&media_type, Some(&video_id.to_string()))
            .map_err(IntoAppError::into_app_error)?;
        let key = thumbnail_key(&filename);
        let size_bytes = data.len();

        let reference = self
            .storage
            .put(&key, data, &media_type)
            .await
            .map_err(IntoAppError::into_app_error)?;

        let video = self
            .videos
            .set_thumbnail_url(video_id, &reference.to_string())
            .await?;

        tracing::info!(key = %key, size_bytes, "Thumbnail stored");
        Ok(video)
    }
}
