//! Keel Application - Use cases and port definitions
//!
//! This crate contains the application layer: placeholder parsing and
//! evaluation, the ports infrastructure must implement, and the use cases
//! that drive them.

pub mod error;
pub mod ports;
pub mod use_cases;
pub mod variables;

pub use error::{ApplicationError, ApplicationResult};
pub use ports::{
    Clock, FileSystem, FileSystemError, PipelineStore, PipelineStoreError, Variables,
    VariablesError,
};
pub use use_cases::{
    EvaluateConfig, EvaluateConfigInput, PauseFailure, PausePipelines, PauseReport,
};
pub use variables::{
    EvaluationError, EvaluationOutcome, Evaluator, ResolutionFailure, VariablesChain, evaluate,
};
