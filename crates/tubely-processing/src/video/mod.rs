//! Video inspection and repackaging via ffprobe / ffmpeg.

pub mod aspect;
mod command;
pub mod probe;
pub mod remux;

pub use aspect::AspectClass;
pub use probe::{FfprobeProbe, StreamInfo, StreamProbe};
pub use remux::{FfmpegRemuxer, Remuxer};

use std::time::Duration;
use tubely_core::MediaConfig;

/// Paths and limits for the external media tools
#[derive(Debug, Clone)]
pub struct MediaToolConfig {
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
    /// Wall-clock limit for a single tool invocation
    pub timeout: Duration,
}

impl From<&MediaConfig> for MediaToolConfig {
    fn from(config: &MediaConfig) -> Self {
        Self {
            ffmpeg_path: config.ffmpeg_path.clone(),
            ffprobe_path: config.ffprobe_path.clone(),
            timeout: Duration::from_secs(config.media_tool_timeout_secs),
        }
    }
}
