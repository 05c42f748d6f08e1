//! Route configuration and setup

use crate::constants::API_PREFIX;
use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tubely_core::{Config, StorageBackend};

/// Path under which the local storage backend's files are served
pub const LOCAL_ASSETS_PATH: &str = "/assets";

/// Allowance for multipart boundaries and part headers on top of the file size limits.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    // Bodies past these limits fail inside the multipart extractor and render as a JSON 413.
    let max_video_body = config.media.max_video_size_bytes + MULTIPART_OVERHEAD_BYTES;
    let max_thumbnail_body = config.media.max_thumbnail_size_bytes + MULTIPART_OVERHEAD_BYTES;

    let api_routes = Router::new()
        .route(
            &format!("{}/videos", API_PREFIX),
            post(handlers::videos::create_video).get(handlers::videos::list_videos),
        )
        .route(
            &format!("{}/videos/{{video_id}}", API_PREFIX),
            get(handlers::videos::get_video),
        )
        .route(
            &format!("{}/video_upload/{{video_id}}", API_PREFIX),
            post(handlers::video_upload::upload_video)
                .layer(DefaultBodyLimit::max(max_video_body)),
        )
        .route(
            &format!("{}/thumbnail_upload/{{video_id}}", API_PREFIX),
            post(handlers::thumbnail_upload::upload_thumbnail)
                .layer(DefaultBodyLimit::max(max_thumbnail_body)),
        )
        .with_state(state);

    let mut app = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route(
            &format!("{}/openapi.json", API_PREFIX),
            get(|| async { Json(crate::api_doc::get_openapi_spec()) }),
        )
        .merge(api_routes)
        .merge(utoipa_rapidoc::RapiDoc::new("/api/openapi.json").path("/docs"));

    if config.storage.backend == StorageBackend::Local {
        if let Some(path) = config.storage.local_storage_path.as_deref() {
            tracing::info!(path = %path, mount = LOCAL_ASSETS_PATH, "Serving local assets");
            app = app.nest_service(LOCAL_ASSETS_PATH, ServeDir::new(path));
        }
    }

    let app = app
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    Ok(app)
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [Method::GET, Method::POST, Method::OPTIONS];

    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .map_err(|e| anyhow::anyhow!("Invalid CORS origin '{}': {}", o, e))
            })
            .collect::<Result<Vec<_>, _>>()?;
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };
    Ok(cors)
}
