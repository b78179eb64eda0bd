//! In-memory variables
//!
//! The pipeline-local store filled from var files and `name=value`
//! assignments on the command line.

use async_trait::async_trait;
use indexmap::IndexMap;
use keel_application::ports::{Variables, VariablesError};
use keel_domain::{ConfigMap, ConfigValue};

use crate::serialization::parse_config_str;

/// Error for a malformed `name=value` assignment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VarAssignmentError {
    /// No `=` separates the name from the value.
    #[error("expected NAME=VALUE, got '{0}'")]
    MissingSeparator(String),

    /// The name before `=` is empty.
    #[error("variable name is empty in '{0}'")]
    EmptyName(String),

    /// The value of a YAML assignment does not parse.
    #[error("invalid YAML value for '{name}': {message}")]
    InvalidYaml {
        /// Variable name.
        name: String,
        /// Parser message.
        message: String,
    },
}

/// Variables held in memory, keyed by name.
///
/// Never fails: a name is either present or it is not.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticVariables {
    values: IndexMap<String, ConfigValue>,
}

impl StaticVariables {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name`, replacing any earlier value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ConfigValue>) {
        self.values.insert(name.into(), value.into());
    }

    /// Builder form of [`Self::insert`].
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Copies every variable of `other` in, overriding names already present.
    pub fn extend(&mut self, other: Self) {
        self.values.extend(other.values);
    }

    /// Sets a string variable from `name=value`. The value is taken verbatim.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no `=` or the name is empty.
    pub fn assign(&mut self, assignment: &str) -> Result<(), VarAssignmentError> {
        let (name, value) = split_assignment(assignment)?;
        self.insert(name, value);
        Ok(())
    }

    /// Sets a variable from `name=yaml`, parsing the value as YAML so it can
    /// be a number, a list or a mapping.
    ///
    /// # Errors
    ///
    /// Returns an error if the assignment is malformed or the YAML is invalid.
    pub fn assign_yaml(&mut self, assignment: &str) -> Result<(), VarAssignmentError> {
        let (name, raw) = split_assignment(assignment)?;
        let value = parse_config_str(raw).map_err(|e| VarAssignmentError::InvalidYaml {
            name: name.to_string(),
            message: e.to_string(),
        })?;
        self.insert(name, value);
        Ok(())
    }

    /// Variable names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Number of variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<ConfigMap> for StaticVariables {
    fn from(values: ConfigMap) -> Self {
        Self { values }
    }
}

fn split_assignment(assignment: &str) -> Result<(&str, &str), VarAssignmentError> {
    let (name, value) = assignment
        .split_once('=')
        .ok_or_else(|| VarAssignmentError::MissingSeparator(assignment.to_string()))?;
    if name.is_empty() {
        return Err(VarAssignmentError::EmptyName(assignment.to_string()));
    }
    Ok((name, value))
}

#[async_trait]
impl Variables for StaticVariables {
    async fn get(&self, name: &str) -> Result<Option<ConfigValue>, VariablesError> {
        Ok(self.values.get(name).cloned())
    }
}
