use async_trait::async_trait;
use sqlx::{PgPool, Postgres};
use tubely_core::models::{CreateVideoParams, Video};
use tubely_core::AppError;
use uuid::Uuid;

use super::VideoRepository;

const VIDEO_COLUMNS: &str =
    "id, user_id, title, description, video_url, thumbnail_url, created_at, updated_at";

/// Postgres-backed video repository
#[derive(Clone)]
pub struct PgVideoRepository {
    pool: PgPool,
}

impl PgVideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Single-column update; other columns keep whatever concurrent writers stored.
    async fn set_reference(
        &self,
        id: Uuid,
        column: &'static str,
        reference: &str,
    ) -> Result<Video, AppError> {
        let updated = sqlx::query_as::<Postgres, Video>(&format!(
            r#"
            UPDATE videos
            SET {} = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            column, VIDEO_COLUMNS
        ))
        .bind(id)
        .bind(reference)
        .fetch_optional(&self.pool)
        .await?;

        updated.ok_or_else(|| AppError::NotFound(format!("Video {} not found", id)))
    }
}

#[async_trait]
impl VideoRepository for PgVideoRepository {
    #[tracing::instrument(skip(self, params), fields(db.table = "videos", db.operation = "insert", user_id = %params.user_id))]
    async fn create_video(&self, params: CreateVideoParams) -> Result<Video, AppError> {
        let video = sqlx::query_as::<Postgres, Video>(&format!(
            r#"
            INSERT INTO videos (id, user_id, title, description)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            VIDEO_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(params.user_id)
        .bind(&params.title)
        .bind(&params.description)
        .fetch_one(&self.pool)
        .await?;

        Ok(video)
    }

    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "select", db.record_id = %id))]
    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        let video = sqlx::query_as::<Postgres, Video>(&format!(
            "SELECT {} FROM videos WHERE id = $1",
            VIDEO_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(video)
    }

    #[tracing::instrument(skip(self, reference), fields(db.table = "videos", db.operation = "update", db.record_id = %id))]
    async fn set_video_url(&self, id: Uuid, reference: &str) -> Result<Video, AppError> {
        self.set_reference(id, "video_url", reference).await
    }

    #[tracing::instrument(skip(self, reference), fields(db.table = "videos", db.operation = "update", db.record_id = %id))]
    async fn set_thumbnail_url(&self, id: Uuid, reference: &str) -> Result<Video, AppError> {
        self.set_reference(id, "thumbnail_url", reference).await
    }

    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "select"))]
    async fn list_videos_for_user(&self, user_id: Uuid) -> Result<Vec<Video>, AppError> {
        let videos = sqlx::query_as::<Postgres, Video>(&format!(
            "SELECT {} FROM videos WHERE user_id = $1 ORDER BY created_at DESC",
            VIDEO_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(videos)
    }
}
