//! Ordered composition of variable sources
//!
//! Pipeline-local vars, a team secret store and global defaults are looked up
//! in that order; the first source that knows a name wins.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use keel_domain::ConfigValue;

use crate::ports::{Variables, VariablesError};

#[derive(Clone)]
struct Layer {
    label: String,
    source: Arc<dyn Variables>,
}

/// Variables composed from an ordered list of labelled sources.
///
/// Lookup rules:
/// 1. Sources are consulted in the order they were added.
/// 2. The first `Some` wins.
/// 3. The first error aborts the lookup and is returned as is. A failing
///    source is never skipped in favour of a lower-precedence one.
/// 4. If no source knows the name, the result is `None`.
#[derive(Default, Clone)]
pub struct VariablesChain {
    layers: Vec<Layer>,
}

impl VariablesChain {
    /// Creates an empty chain, which knows no variables.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a source with lower precedence than every source already added.
    #[must_use]
    pub fn with(mut self, label: impl Into<String>, source: impl Variables + 'static) -> Self {
        self.push(label, Arc::new(source));
        self
    }

    /// Appends an already shared source.
    pub fn push(&mut self, label: impl Into<String>, source: Arc<dyn Variables>) {
        self.layers.push(Layer {
            label: label.into(),
            source,
        });
    }

    /// Returns the labels in precedence order.
    #[must_use]
    pub fn labels(&self) -> Vec<&str> {
        self.layers.iter().map(|layer| layer.label.as_str()).collect()
    }

    /// Returns the number of sources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Returns true if the chain has no sources.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl fmt::Debug for VariablesChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariablesChain")
            .field("layers", &self.labels())
            .finish()
    }
}

#[async_trait]
impl Variables for VariablesChain {
    async fn get(&self, name: &str) -> Result<Option<ConfigValue>, VariablesError> {
        for layer in &self.layers {
            match layer.source.get(name).await {
                Ok(Some(value)) => {
                    tracing::debug!(variable = name, layer = %layer.label, "variable found");
                    return Ok(Some(value));
                }
                Ok(None) => {}
                Err(error) => {
                    tracing::warn!(variable = name, layer = %layer.label, %error, "variable lookup failed");
                    return Err(error);
                }
            }
        }

        tracing::debug!(variable = name, layers = self.layers.len(), "variable not found in any layer");
        Ok(None)
    }
}
