use std::io;
use std::time::Duration;

/// Failures from the external media tools
#[derive(Debug, thiserror::Error)]
pub enum MediaToolError {
    /// ffprobe exited non-zero or printed output that is not probe JSON
    #[error("ffprobe failed: {0}")]
    ProbeFailed(String),

    /// Probe output had no usable video stream
    #[error("no usable stream info: {0}")]
    NoStreamInfo(String),

    /// ffmpeg exited non-zero or produced no output
    #[error("remux failed: {0}")]
    RemuxFailed(String),

    #[error("{tool} did not finish within {timeout:?} and was killed")]
    Timeout {
        tool: &'static str,
        timeout: Duration,
    },

    #[error("failed to run {tool}: {source}")]
    Spawn {
        tool: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_message_keeps_sub_second_precision() {
        let err = MediaToolError::Timeout {
            tool: "ffprobe",
            timeout: Duration::from_millis(200),
        };
        assert_eq!(
            err.to_string(),
            "ffprobe did not finish within 200ms and was killed"
        );
    }
}
