//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use tubely_core::models;

/// Returns the OpenAPI document served at `/api/openapi.json`.
pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tubely API",
        version = "0.1.0",
        description = "Video ingestion API. Uploaded MP4s are classified by aspect ratio, remuxed for fast start and stored in object storage; records are returned with short-lived signed URLs."
    ),
    paths(
        handlers::health::health_check,
        handlers::videos::create_video,
        handlers::videos::get_video,
        handlers::videos::list_videos,
        handlers::video_upload::upload_video,
        handlers::thumbnail_upload::upload_thumbnail,
    ),
    components(schemas(
        models::VideoResponse,
        handlers::videos::CreateVideoRequest,
        handlers::health::HealthResponse,
        error::ErrorResponse,
    )),
    tags(
        (name = "videos", description = "Video records"),
        (name = "uploads", description = "Video and thumbnail uploads"),
        (name = "health", description = "Operational endpoints")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_upload_paths() {
        let spec = get_openapi_spec();
        for path in [
            "/health",
            "/api/videos",
            "/api/videos/{video_id}",
            "/api/video_upload/{video_id}",
            "/api/thumbnail_upload/{video_id}",
        ] {
            assert!(spec.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
