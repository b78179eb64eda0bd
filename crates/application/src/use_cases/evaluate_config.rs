//! Evaluate configuration use case
//!
//! Resolves the placeholders of one configuration fragment (a resource
//! source, a task's params) right before it is used.

use keel_domain::ConfigValue;
use serde::de::DeserializeOwned;

use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::Variables;
use crate::variables::{EvaluationOutcome, Evaluator};

/// Input for evaluating a configuration fragment.
#[derive(Debug, Clone)]
pub struct EvaluateConfigInput {
    /// Human-readable name of the fragment, used in logs and errors
    /// (e.g. `resource git-repo source`).
    pub fragment: String,
    /// The raw fragment as authored.
    pub config: ConfigValue,
}

impl EvaluateConfigInput {
    /// Creates a new input.
    #[must_use]
    pub fn new(fragment: impl Into<String>, config: ConfigValue) -> Self {
        Self {
            fragment: fragment.into(),
            config,
        }
    }
}

/// Evaluates configuration fragments against a variables source.
pub struct EvaluateConfig<V> {
    evaluator: Evaluator<V>,
}

impl<V: Variables> EvaluateConfig<V> {
    /// Creates a new `EvaluateConfig` use case.
    pub const fn new(variables: V) -> Self {
        Self {
            evaluator: Evaluator::new(variables),
        }
    }

    /// Executes the use case.
    ///
    /// Only variable names are logged, never their values.
    ///
    /// # Errors
    /// Returns `ApplicationError::Evaluation` listing every reference that
    /// failed to resolve.
    pub async fn execute(&self, input: &EvaluateConfigInput) -> ApplicationResult<EvaluationOutcome> {
        match self.evaluator.evaluate(&input.config).await {
            Ok(outcome) => {
                tracing::info!(
                    fragment = %input.fragment,
                    resolved = ?outcome.resolved_names,
                    "evaluated configuration"
                );
                Ok(outcome)
            }
            Err(error) => {
                tracing::warn!(
                    fragment = %input.fragment,
                    failures = error.failures().len(),
                    aborted = error.aborted(),
                    "configuration has unresolved references"
                );
                Err(error.into())
            }
        }
    }

    /// Executes the use case and decodes the result into `T`.
    ///
    /// # Errors
    /// Returns `ApplicationError::Evaluation` if resolution fails, or
    /// `ApplicationError::Decode` if the evaluated tree does not fit `T`.
    pub async fn execute_as<T: DeserializeOwned>(
        &self,
        input: &EvaluateConfigInput,
    ) -> ApplicationResult<(T, EvaluationOutcome)> {
        let outcome = self.execute(input).await?;
        let typed = outcome.decode().map_err(|e| ApplicationError::Decode {
            fragment: input.fragment.clone(),
            // serde messages can quote the offending value; scrub secrets out of it.
            message: outcome.redact(&e.to_string()),
        })?;
        Ok((typed, outcome))
    }
}
