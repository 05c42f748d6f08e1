//! API constants

/// API base path prefix
pub const API_PREFIX: &str = "/api";

/// Multipart field carrying the video file
pub const VIDEO_FIELD: &str = "video";

/// Multipart field carrying the thumbnail image
pub const THUMBNAIL_FIELD: &str = "thumbnail";

/// Crate version reported by the health check
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
