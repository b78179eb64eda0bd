//! Parsed variable references
//!
//! A [`Reference`] is what a `((name.field))` placeholder points at: a
//! top-level variable name plus an optional path into a structured value.

use std::fmt;

use crate::error::{DomainError, DomainResult};
use crate::value::ConfigValue;

/// A reference to a variable, optionally projected through a field path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Reference {
    name: String,
    path: Vec<String>,
}

impl Reference {
    /// Creates a reference from a name and field path, validating every segment.
    ///
    /// Segments must be non-empty and may not contain whitespace, `.`, `(` or `)`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidReference` if any segment is invalid.
    pub fn try_new<I, S>(name: impl Into<String>, path: I) -> DomainResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        validate_segment(&name)?;

        let path = path
            .into_iter()
            .map(Into::into)
            .map(|segment: String| validate_segment(&segment).map(|()| segment))
            .collect::<DomainResult<Vec<_>>>()?;

        Ok(Self { name, path })
    }

    /// Creates a reference to a bare variable name.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidReference` if the name is invalid.
    pub fn named(name: impl Into<String>) -> DomainResult<Self> {
        Self::try_new(name, std::iter::empty::<String>())
    }

    /// The top-level variable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The field path inside the variable's value. Empty for bare references.
    #[must_use]
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Projects `value` through this reference's field path.
    ///
    /// Each segment is a mapping-key lookup. A bare reference returns `value`
    /// itself.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::FieldNotFound` naming the first segment that is
    /// absent or whose parent is not a mapping.
    pub fn project<'v>(&self, value: &'v ConfigValue) -> DomainResult<&'v ConfigValue> {
        self.path.iter().try_fold(value, |current, field| match current {
            ConfigValue::Mapping(map) => map.get(field).ok_or_else(|| DomainError::FieldNotFound {
                field: field.clone(),
                reason: "no such key".to_string(),
            }),
            other => Err(DomainError::FieldNotFound {
                field: field.clone(),
                reason: format!("parent value is a {}, not a mapping", other.kind()),
            }),
        })
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(({}", self.name)?;
        for segment in &self.path {
            write!(f, ".{segment}")?;
        }
        write!(f, "))")
    }
}

fn validate_segment(segment: &str) -> DomainResult<()> {
    if segment.is_empty() {
        return Err(DomainError::InvalidReference(
            "empty name or field segment".to_string(),
        ));
    }

    if let Some(bad) = segment
        .chars()
        .find(|c| c.is_whitespace() || matches!(c, '.' | '(' | ')'))
    {
        return Err(DomainError::InvalidReference(format!(
            "segment '{segment}' contains '{}'",
            bad.escape_default()
        )));
    }

    Ok(())
}
