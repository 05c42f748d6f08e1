use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tubely_core::models::{CreateVideoParams, Video};
use tubely_core::AppError;
use uuid::Uuid;

use super::VideoRepository;

/// Process-local video repository. Data does not survive a restart.
#[derive(Clone, Default)]
pub struct InMemoryVideoRepository {
    videos: Arc<RwLock<HashMap<Uuid, Video>>>,
}

impl InMemoryVideoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn modify(&self, id: Uuid, apply: impl FnOnce(&mut Video)) -> Result<Video, AppError> {
        let mut videos = self.videos.write().await;
        let stored = videos
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Video {} not found", id)))?;

        apply(stored);
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }
}

#[async_trait]
impl VideoRepository for InMemoryVideoRepository {
    async fn create_video(&self, params: CreateVideoParams) -> Result<Video, AppError> {
        let now = Utc::now();
        let video = Video {
            id: Uuid::new_v4(),
            user_id: params.user_id,
            title: params.title,
            description: params.description,
            video_url: None,
            thumbnail_url: None,
            created_at: now,
            updated_at: now,
        };
        self.videos.write().await.insert(video.id, video.clone());
        Ok(video)
    }

    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        Ok(self.videos.read().await.get(&id).cloned())
    }

    async fn set_video_url(&self, id: Uuid, reference: &str) -> Result<Video, AppError> {
        self.modify(id, |video| video.video_url = Some(reference.to_string()))
            .await
    }

    async fn set_thumbnail_url(&self, id: Uuid, reference: &str) -> Result<Video, AppError> {
        self.modify(id, |video| video.thumbnail_url = Some(reference.to_string()))
            .await
    }

    async fn list_videos_for_user(&self, user_id: Uuid) -> Result<Vec<Video>, AppError> {
        let mut videos: Vec<Video> = self
            .videos
            .read()
            .await
            .values()
            .filter(|v| v.user_id == user_id)
            .cloned()
            .collect();
        videos.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(videos)
    }
}
