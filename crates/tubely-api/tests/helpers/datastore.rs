//! Datastore wrapper that can be told to fail reference writes.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use tubely_core::models::{CreateVideoParams, Video};
use tubely_core::AppError;
use tubely_db::{InMemoryVideoRepository, VideoRepository};
use uuid::Uuid;

#[derive(Default)]
pub struct TestVideoRepository {
    inner: InMemoryVideoRepository,
    reject_writes: AtomicBool,
}

impl TestVideoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent reference write fail as if the pool were exhausted.
    pub fn reject_writes(&self) {
        self.reject_writes.store(true, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<(), AppError> {
        if self.reject_writes.load(Ordering::SeqCst) {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl VideoRepository for TestVideoRepository {
    async fn create_video(&self, params: CreateVideoParams) -> Result<Video, AppError> {
        self.inner.create_video(params).await
    }

    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        self.inner.get_video(id).await
    }

    async fn set_video_url(&self, id: Uuid, reference: &str) -> Result<Video, AppError> {
        self.check_writable()?;
        self.inner.set_video_url(id, reference).await
    }

    async fn set_thumbnail_url(&self, id: Uuid, reference: &str) -> Result<Video, AppError> {
        self.check_writable()?;
        self.inner.set_thumbnail_url(id, reference).await
    }

    async fn list_videos_for_user(&self, user_id: Uuid) -> Result<Vec<Video>, AppError> {
        self.inner.list_videos_for_user(user_id).await
    }
}
