//! Serialization for config fragments, var files, and the pipeline store.
//!
//! JSON written by keel is deterministic:
//! - 2-space indentation
//! - trailing newline
//! - key order as authored (`IndexMap` in `ConfigValue`)
//!
//! Config fragments and var files are read as YAML, which also accepts JSON.

mod json;
mod yaml;

pub use json::{from_json_bytes, to_json_stable, to_json_stable_bytes};
pub use yaml::{parse_config, parse_config_str};

/// Error type for serialization operations.
#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    /// JSON serialization failed.
    #[error("JSON serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// JSON deserialization failed.
    #[error("JSON deserialization failed: {0}")]
    Deserialize(serde_json::Error),

    /// YAML parsing failed.
    #[error("YAML parsing failed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// UTF-8 encoding error.
    #[error("UTF-8 encoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
