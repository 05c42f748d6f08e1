//! Local staging of uploads.
//!
//! A [`StagedFile`] owns a path on local disk and deletes it when dropped, so every exit
//! path of a request (success, error, client disconnect) leaves no temp files behind.

use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempPath;

/// Where staged files are created
#[derive(Debug, Clone, Default)]
pub struct StagingArea {
    dir: Option<PathBuf>,
}

impl StagingArea {
    /// `None` uses the system temp directory.
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    /// Create an empty staged file and return it with an open handle for writing.
    pub async fn create(&self, suffix: &str) -> io::Result<(StagedFile, tokio::fs::File)> {
        let dir = self.dir();
        tokio::fs::create_dir_all(&dir).await?;

        let suffix = suffix.to_string();
        let named = tokio::task::spawn_blocking(move || {
            tempfile::Builder::new()
                .prefix("tubely-upload-")
                .suffix(&suffix)
                .tempfile_in(dir)
        })
        .await
        .map_err(io::Error::other)??;

        let (file, path) = named.into_parts();
        Ok((StagedFile { path }, tokio::fs::File::from_std(file)))
    }
}

/// A local file deleted on drop
#[derive(Debug)]
pub struct StagedFile {
    path: TempPath,
}

impl StagedFile {
    /// Take ownership of a path another step writes to (e.g. a remux output).
    ///
    /// The path does not need to exist yet; it is removed on drop if it does.
    pub fn adopt(path: PathBuf) -> Self {
        Self {
            path: TempPath::from_path(path),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size in bytes; zero when the file was never created.
    pub async fn len(&self) -> io::Result<u64> {
        match tokio::fs::metadata(self.path()).await {
            Ok(meta) => Ok(meta.len()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(0),
            Err(e) => Err(e),
        }
    }

    pub async fn is_empty(&self) -> io::Result<bool> {
        Ok(self.len().await? == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncWriteExt;

    #[tokio::test]
    async fn test_staged_file_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let staging = StagingArea::new(Some(dir.path().to_path_buf()));

        let (staged, mut file) = staging.create(".mp4").await.unwrap();
        file.write_all(b"ftypisom").await.unwrap();
        file.flush().await.unwrap();
        drop(file);

        let path = staged.path().to_path_buf();
        assert!(path.exists());
        assert!(path.to_string_lossy().ends_with(".mp4"));
        assert_eq!(staged.len().await.unwrap(), 8);

        drop(staged);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_adopted_path_cleaned_up() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("upload.mp4.processing");

        let adopted = StagedFile::adopt(output.clone());
        assert!(adopted.is_empty().await.unwrap());

        std::fs::write(&output, b"moov").unwrap();
        assert_eq!(adopted.len().await.unwrap(), 4);

        drop(adopted);
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn test_adopting_missing_path_is_harmless() {
        let dir = tempfile::tempdir().unwrap();
        let adopted = StagedFile::adopt(dir.path().join("never-written"));
        drop(adopted);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
