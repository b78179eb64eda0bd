//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the application core and external systems.
//! Each port is a trait that can be implemented by adapters in the infrastructure layer.

mod clock;
mod file_system;
mod pipeline_store;
mod variables;

pub use clock::Clock;
pub use file_system::{FileSystem, FileSystemError};
pub use pipeline_store::{PipelineStore, PipelineStoreError};
pub use variables::{Variables, VariablesError};
