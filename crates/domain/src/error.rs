//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A variable reference is malformed.
    #[error("invalid variable reference: {0}")]
    InvalidReference(String),

    /// A field path segment could not be followed inside a structured value.
    #[error("field '{field}' not found: {reason}")]
    FieldNotFound {
        /// The path segment that failed.
        field: String,
        /// Why the lookup failed.
        reason: String,
    },

    /// An inactivity threshold is out of range.
    #[error("invalid inactivity threshold: {0}")]
    InvalidThreshold(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
