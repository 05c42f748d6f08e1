//! Video record repositories.
//!
//! Both implementations treat each call as a single atomic, strongly consistent operation.

mod memory;
mod video;

pub use memory::InMemoryVideoRepository;
pub use video::PgVideoRepository;

use async_trait::async_trait;
use tubely_core::models::{CreateVideoParams, Video};
use tubely_core::AppError;
use uuid::Uuid;

#[async_trait]
pub trait VideoRepository: Send + Sync {
    /// Create a draft record with no video or thumbnail yet
    async fn create_video(&self, params: CreateVideoParams) -> Result<Video, AppError>;

    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError>;

    /// Set only `video_url` (and `updated_at`), leaving every other column as stored.
    ///
    /// Returns `NotFound` if the record no longer exists.
    async fn set_video_url(&self, id: Uuid, reference: &str) -> Result<Video, AppError>;

    /// Set only `thumbnail_url` (and `updated_at`).
    async fn set_thumbnail_url(&self, id: Uuid, reference: &str) -> Result<Video, AppError>;

    /// Newest first
    async fn list_videos_for_user(&self, user_id: Uuid) -> Result<Vec<Video>, AppError>;
}
