//! Persistence adapters backed by the file system.

mod file_system;
mod pipeline_store;
mod var_file;

pub use file_system::TokioFileSystem;
pub use pipeline_store::FilePipelineStore;
pub use var_file::{VarFileError, VarFileLoader};
