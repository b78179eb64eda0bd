//! Var file loading
//!
//! A var file is a YAML or JSON document whose top level is a mapping of
//! variable names to values:
//!
//! ```yaml
//! branch: main
//! git:
//!   private_key: |
//!     -----BEGIN KEY-----
//! ```

use std::path::{Path, PathBuf};

use keel_application::ports::{FileSystem, FileSystemError};
use keel_domain::ConfigValue;

use crate::adapters::StaticVariables;
use crate::serialization::{SerializationError, parse_config};

/// Errors raised while loading a var file.
#[derive(Debug, thiserror::Error)]
pub enum VarFileError {
    /// The file could not be read.
    #[error(transparent)]
    FileSystem(#[from] FileSystemError),

    /// The file is not valid YAML or JSON.
    #[error("failed to parse var file {}: {source}", path.display())]
    Parse {
        /// The var file.
        path: PathBuf,
        /// Underlying parser error.
        source: SerializationError,
    },

    /// The top level of the file is not a mapping.
    #[error("var file {} must contain a mapping, found a {kind}", path.display())]
    NotAMapping {
        /// The var file.
        path: PathBuf,
        /// What the top level actually is.
        kind: &'static str,
    },
}

/// Loads var files into [`StaticVariables`].
#[derive(Debug, Clone)]
pub struct VarFileLoader<F> {
    fs: F,
}

impl<F: FileSystem> VarFileLoader<F> {
    /// Creates a loader reading through `fs`.
    pub const fn new(fs: F) -> Self {
        Self { fs }
    }

    /// Loads one var file. A null document yields no variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or its top
    /// level is not a mapping.
    pub async fn load(&self, path: &Path) -> Result<StaticVariables, VarFileError> {
        let bytes = self.fs.read_file(path).await?;
        let document = parse_config(&bytes).map_err(|source| VarFileError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let vars = match document {
            ConfigValue::Null => StaticVariables::new(),
            ConfigValue::Mapping(map) => StaticVariables::from(map),
            other => {
                return Err(VarFileError::NotAMapping {
                    path: path.to_path_buf(),
                    kind: other.kind(),
                });
            }
        };

        tracing::debug!(path = %path.display(), count = vars.len(), "loaded var file");
        Ok(vars)
    }

    /// Loads several var files into one store. Later files override earlier ones.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered.
    pub async fn load_all<P: AsRef<Path>>(
        &self,
        paths: &[P],
    ) -> Result<StaticVariables, VarFileError> {
        let mut merged = StaticVariables::new();
        for path in paths {
            merged.extend(self.load(path.as_ref()).await?);
        }
        Ok(merged)
    }
}
