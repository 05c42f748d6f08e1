//! Fakes for the external media tools.

use async_trait::async_trait;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tubely_processing::video::remux::output_path_for;
use tubely_processing::{MediaToolError, Remuxer, StagedFile, StreamInfo, StreamProbe};

/// Prefix the fake remuxer writes ahead of the original bytes.
pub const FASTSTART_MARKER: &[u8] = b"faststart:";

pub struct FakeProbe {
    info: Option<StreamInfo>,
    calls: AtomicUsize,
}

impl FakeProbe {
    pub fn returning(info: StreamInfo) -> Self {
        Self {
            info: Some(info),
            calls: AtomicUsize::new(0),
        }
    }

    /// A probe that fails like ffprobe on a corrupt file.
    pub fn failing() -> Self {
        Self {
            info: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StreamProbe for FakeProbe {
    async fn probe(&self, path: &Path) -> Result<StreamInfo, MediaToolError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert!(path.exists(), "probe called on a missing file");
        self.info.ok_or_else(|| {
            MediaToolError::ProbeFailed("exit status: 1: moov atom not found".to_string())
        })
    }
}

pub struct FakeRemuxer {
    fail: bool,
    delay: Duration,
    calls: AtomicUsize,
}

impl FakeRemuxer {
    /// Writes `FASTSTART_MARKER` followed by the input next to the input file.
    pub fn working() -> Self {
        Self {
            fail: false,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    /// A working remuxer that takes `delay` before producing its output.
    pub fn slow(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::working()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::working()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Remuxer for FakeRemuxer {
    async fn remux(&self, input: &Path) -> Result<StagedFile, MediaToolError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        let output = StagedFile::adopt(output_path_for(input));

        if self.fail {
            // A partial output that the guard must clean up.
            tokio::fs::write(output.path(), b"partial").await?;
            return Err(MediaToolError::RemuxFailed(
                "exit status: 1: Invalid data found when processing input".to_string(),
            ));
        }

        let mut data = FASTSTART_MARKER.to_vec();
        data.extend(tokio::fs::read(input).await?);
        tokio::fs::write(output.path(), data).await?;
        Ok(output)
    }
}
