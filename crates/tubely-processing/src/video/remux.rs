use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::process::Command;

use super::command::{run_tool, stderr_tail};
use super::MediaToolConfig;
use crate::error::MediaToolError;
use crate::staging::StagedFile;

/// Suffix appended to the input path to form the remux output path.
pub const PROCESSING_SUFFIX: &str = ".processing";

/// Rewrites a video's container so the index precedes the media data (fast start).
#[async_trait]
pub trait Remuxer: Send + Sync {
    /// Remux `input` into a new local file. The returned file is deleted on drop.
    async fn remux(&self, input: &Path) -> Result<StagedFile, MediaToolError>;
}

pub fn output_path_for(input: &Path) -> PathBuf {
    let mut path = OsString::from(input.as_os_str());
    path.push(PROCESSING_SUFFIX);
    PathBuf::from(path)
}

/// [`Remuxer`] backed by ffmpeg stream copy with `-movflags faststart`
#[derive(Debug, Clone)]
pub struct FfmpegRemuxer {
    config: MediaToolConfig,
}

impl FfmpegRemuxer {
    pub fn new(config: MediaToolConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Remuxer for FfmpegRemuxer {
    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffmpeg",
        process.executable.path = %self.config.ffmpeg_path,
        ffmpeg.operation = "remux"
    ))]
    async fn remux(&self, input: &Path) -> Result<StagedFile, MediaToolError> {
        let start = std::time::Instant::now();

        // Owned before ffmpeg runs so a partial output is removed on failure.
        let output_file = StagedFile::adopt(output_path_for(input));

        let mut command = Command::new(&self.config.ffmpeg_path);
        command
            .arg("-y")
            .arg("-i")
            .arg(input)
            .args(["-c", "copy", "-movflags", "faststart", "-f", "mp4"])
            .arg(output_file.path());

        let output = run_tool("ffmpeg", command, self.config.timeout).await?;

        if !output.status.success() {
            return Err(MediaToolError::RemuxFailed(format!(
                "{}: {}",
                output.status,
                stderr_tail(&output)
            )));
        }

        // A clean exit with nothing written still counts as a failure.
        let size = output_file.len().await?;
        if size == 0 {
            return Err(MediaToolError::RemuxFailed(
                "ffmpeg produced an empty output file".to_string(),
            ));
        }

        tracing::info!(
            duration_ms = start.elapsed().as_millis(),
            size_bytes = size,
            "Fast-start remux completed"
        );

        Ok(output_file)
    }
}
