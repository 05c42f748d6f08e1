use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use tokio::process::Command;

use super::aspect::AspectClass;
use super::command::{run_tool, stderr_tail};
use super::MediaToolConfig;
use crate::error::MediaToolError;

/// Dimensions of the first video stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamInfo {
    pub width: u32,
    pub height: u32,
}

impl StreamInfo {
    pub fn aspect_class(&self) -> AspectClass {
        AspectClass::from_dimensions(self.width, self.height)
    }
}

/// Reads stream metadata from a local video file.
#[async_trait]
pub trait StreamProbe: Send + Sync {
    async fn probe(&self, path: &Path) -> Result<StreamInfo, MediaToolError>;
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    #[serde(default)]
    codec_type: Option<String>,
    #[serde(default)]
    width: Option<i64>,
    #[serde(default)]
    height: Option<i64>,
}

/// Extract the first video stream's dimensions from `ffprobe -print_format json` output.
///
/// Streams without a `codec_type` are treated as video.
pub fn parse_probe_output(stdout: &[u8]) -> Result<StreamInfo, MediaToolError> {
    let output: ProbeOutput = serde_json::from_slice(stdout)
        .map_err(|e| MediaToolError::ProbeFailed(format!("unparseable output: {}", e)))?;

    if output.streams.is_empty() {
        return Err(MediaToolError::NoStreamInfo("no streams found".to_string()));
    }

    let stream = output
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref().map_or(true, |t| t == "video"))
        .ok_or_else(|| MediaToolError::NoStreamInfo("no video stream found".to_string()))?;

    match (stream.width, stream.height) {
        (Some(width), Some(height)) if width > 0 && height > 0 => Ok(StreamInfo {
            width: u32::try_from(width)
                .map_err(|_| MediaToolError::NoStreamInfo(format!("width {} out of range", width)))?,
            height: u32::try_from(height).map_err(|_| {
                MediaToolError::NoStreamInfo(format!("height {} out of range", height))
            })?,
        }),
        (width, height) => Err(MediaToolError::NoStreamInfo(format!(
            "invalid dimensions {:?}x{:?}",
            width, height
        ))),
    }
}

/// [`StreamProbe`] backed by the ffprobe binary
#[derive(Debug, Clone)]
pub struct FfprobeProbe {
    config: MediaToolConfig,
}

impl FfprobeProbe {
    pub fn new(config: MediaToolConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl StreamProbe for FfprobeProbe {
    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffprobe",
        process.executable.path = %self.config.ffprobe_path,
        ffmpeg.operation = "probe"
    ))]
    async fn probe(&self, path: &Path) -> Result<StreamInfo, MediaToolError> {
        let start = std::time::Instant::now();

        let mut command = Command::new(&self.config.ffprobe_path);
        command
            .args(["-v", "error", "-print_format", "json", "-show_streams"])
            .arg(path);

        let output = run_tool("ffprobe", command, self.config.timeout).await?;

        if !output.status.success() {
            return Err(MediaToolError::ProbeFailed(format!(
                "{}: {}",
                output.status,
                stderr_tail(&output)
            )));
        }

        let info = parse_probe_output(&output.stdout)?;

        tracing::info!(
            duration_ms = start.elapsed().as_millis(),
            width = info.width,
            height = info.height,
            "Video probe completed"
        );

        Ok(info)
    }
}
