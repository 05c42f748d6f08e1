//! Service initialization and application state setup

use crate::state::AppState;
use std::sync::Arc;
use tubely_core::Config;
use tubely_db::VideoRepository;
use tubely_processing::{FfmpegRemuxer, FfprobeProbe, MediaToolConfig};
use tubely_storage::Storage;

/// Build the application state with the ffprobe/ffmpeg-backed media tools.
pub fn initialize_services(
    config: &Config,
    videos: Arc<dyn VideoRepository>,
    storage: Arc<dyn Storage>,
) -> Arc<AppState> {
    let tools = MediaToolConfig::from(&config.media);
    tracing::info!(
        ffprobe_path = %tools.ffprobe_path,
        ffmpeg_path = %tools.ffmpeg_path,
        timeout_secs = tools.timeout.as_secs(),
        "Media tools configured"
    );

    Arc::new(AppState::new(
        config.clone(),
        videos,
        storage,
        Arc::new(FfprobeProbe::new(tools.clone())),
        Arc::new(FfmpegRemuxer::new(tools)),
    ))
}
