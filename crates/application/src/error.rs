//! Application error types

use thiserror::Error;
use keel_domain::DomainError;

use crate::ports::PipelineStoreError;
use crate::variables::EvaluationError;

/// Application-level errors.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A domain validation error occurred.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// One or more references in a configuration fragment failed to resolve.
    #[error("{0}")]
    Evaluation(#[from] EvaluationError),

    /// The evaluated configuration did not match the expected structure.
    #[error("invalid {fragment}: {message}")]
    Decode {
        /// Which configuration fragment was being decoded.
        fragment: String,
        /// The decoder's message.
        message: String,
    },

    /// The pipeline store failed.
    #[error("pipeline store error: {0}")]
    PipelineStore(#[from] PipelineStoreError),
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
