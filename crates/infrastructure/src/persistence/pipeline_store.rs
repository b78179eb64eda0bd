//! File-backed pipeline store.
//!
//! All pipelines live in one JSON document:
//!
//! ```text
//! [
//!   {
//!     "team": "main",
//!     "name": "deploy",
//!     "paused": false,
//!     "jobs": [{ "name": "build", "last_scheduled": "2024-05-01T10:00:00Z" }]
//!   }
//! ]
//! ```
//!
//! Writes go to a sibling temporary file that is then renamed over the
//! original, so readers never see a half-written document.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use keel_application::ports::{FileSystem, FileSystemError, PipelineStore, PipelineStoreError};
use keel_domain::{PipelineActivity, PipelineRef};
use tokio::sync::Mutex;

use crate::serialization::{from_json_bytes, to_json_stable_bytes};

/// Converts a `FileSystemError` into the store's I/O error.
fn to_io_error(e: FileSystemError) -> std::io::Error {
    match e {
        FileSystemError::Io(io_err) => io_err,
        FileSystemError::NotFound(path) => {
            std::io::Error::new(std::io::ErrorKind::NotFound, path.display().to_string())
        }
        FileSystemError::PermissionDenied(path) => std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            path.display().to_string(),
        ),
    }
}

/// Pipeline store persisted as a stable JSON file.
#[derive(Debug)]
pub struct FilePipelineStore<F> {
    fs: F,
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl<F: FileSystem> FilePipelineStore<F> {
    /// Creates a store backed by the JSON file at `path`.
    pub fn new(fs: F, path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// The backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replaces the stored pipelines.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be serialized or written.
    pub async fn save(&self, pipelines: &[PipelineActivity]) -> Result<(), PipelineStoreError> {
        let _guard = self.write_lock.lock().await;
        self.write(pipelines).await
    }

    async fn read(&self) -> Result<Vec<PipelineActivity>, PipelineStoreError> {
        if !self.fs.exists(&self.path).await {
            tracing::debug!(path = %self.path.display(), "pipeline store file absent, no pipelines");
            return Ok(Vec::new());
        }
        let bytes = self.fs.read_file(&self.path).await.map_err(to_io_error)?;
        from_json_bytes(&bytes).map_err(|e| PipelineStoreError::Serialization(e.to_string()))
    }

    async fn write(&self, pipelines: &[PipelineActivity]) -> Result<(), PipelineStoreError> {
        let bytes = to_json_stable_bytes(&pipelines)
            .map_err(|e| PipelineStoreError::Serialization(e.to_string()))?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        self.fs.write_file(&tmp, &bytes).await.map_err(to_io_error)?;
        self.fs.rename(&tmp, &self.path).await.map_err(to_io_error)?;
        Ok(())
    }
}

#[async_trait]
impl<F: FileSystem> PipelineStore for FilePipelineStore<F> {
    async fn pipelines(&self) -> Result<Vec<PipelineActivity>, PipelineStoreError> {
        self.read().await
    }

    async fn pause(&self, pipeline: &PipelineRef) -> Result<(), PipelineStoreError> {
        let _guard = self.write_lock.lock().await;
        let mut pipelines = self.read().await?;

        let entry = pipelines
            .iter_mut()
            .find(|p| &p.pipeline == pipeline)
            .ok_or_else(|| PipelineStoreError::NotFound(pipeline.clone()))?;
        if entry.paused {
            return Ok(());
        }
        entry.paused = true;

        self.write(&pipelines).await
    }
}
