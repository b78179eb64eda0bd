//! Keel Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer.

pub mod adapters;
pub mod persistence;
pub mod serialization;

pub use adapters::{DeadlineVariables, FixedClock, StaticVariables, SystemClock, VarAssignmentError};
pub use persistence::{FilePipelineStore, TokioFileSystem, VarFileError, VarFileLoader};
pub use serialization::{
    SerializationError, from_json_bytes, parse_config, parse_config_str, to_json_stable,
    to_json_stable_bytes,
};
