//! Variables port
//!
//! The single contract every variable or secret backend fulfils.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use keel_domain::ConfigValue;

/// Errors a variables backend can report.
///
/// "Not found" is not an error: it is `Ok(None)` from [`Variables::get`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VariablesError {
    /// The backend is unreachable or down; every lookup would fail the same way.
    #[error("variables backend unavailable: {0}")]
    Unavailable(String),

    /// The lookup did not finish before its deadline.
    #[error("lookup timed out after {0:?}")]
    Timeout(Duration),

    /// The backend refused the lookup.
    #[error("access denied: {0}")]
    AccessDenied(String),

    /// Any other backend failure for this particular lookup.
    #[error("lookup failed: {0}")]
    Backend(String),
}

impl VariablesError {
    /// Returns true if the failure is an outage of the whole backend rather
    /// than a problem with one variable.
    #[must_use]
    pub const fn is_systemic(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Timeout(_))
    }
}

/// A source of variable values, such as a secret store or pipeline-local vars.
///
/// Implementations own their thread-safety. Callers may share one instance
/// across concurrent evaluations.
#[async_trait]
pub trait Variables: Send + Sync {
    /// Looks up a variable by name.
    ///
    /// # Returns
    /// * `Ok(Some(value))` - the variable exists
    /// * `Ok(None)` - this source does not know the variable
    /// * `Err(error)` - the source itself failed
    async fn get(&self, name: &str) -> Result<Option<ConfigValue>, VariablesError>;
}

#[async_trait]
impl<T: Variables + ?Sized> Variables for Arc<T> {
    async fn get(&self, name: &str) -> Result<Option<ConfigValue>, VariablesError> {
        (**self).get(name).await
    }
}

#[async_trait]
impl<T: Variables + ?Sized> Variables for Box<T> {
    async fn get(&self, name: &str) -> Result<Option<ConfigValue>, VariablesError> {
        (**self).get(name).await
    }
}
