//! Pipeline store port
//!
//! The narrow slice of pipeline persistence the inactivity pauser needs:
//! read job activity, flip the paused flag. Nothing else, and in particular
//! nothing to do with credentials.

use async_trait::async_trait;

use keel_domain::{PipelineActivity, PipelineRef};

/// Errors that can occur during pipeline store operations.
#[derive(Debug, thiserror::Error)]
pub enum PipelineStoreError {
    /// Pipeline not found.
    #[error("Pipeline not found: {0}")]
    NotFound(PipelineRef),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Repository trait for pipeline activity.
#[async_trait]
pub trait PipelineStore: Send + Sync {
    /// Lists every pipeline with the last-scheduled time of each of its jobs.
    async fn pipelines(&self) -> Result<Vec<PipelineActivity>, PipelineStoreError>;

    /// Marks a pipeline as paused.
    ///
    /// Pausing an already paused pipeline succeeds and changes nothing.
    ///
    /// # Errors
    /// Returns `PipelineStoreError::NotFound` if the pipeline doesn't exist.
    async fn pause(&self, pipeline: &PipelineRef) -> Result<(), PipelineStoreError>;
}
