//! Per-lookup deadline for slow variable backends.

use std::time::Duration;

use async_trait::async_trait;
use keel_application::ports::{Variables, VariablesError};
use keel_domain::ConfigValue;

/// Wraps a resolver so each lookup gives up after `timeout`.
///
/// An expired lookup reports [`VariablesError::Timeout`], which the evaluator
/// treats as systemic and stops. Nothing is retried.
#[derive(Debug, Clone)]
pub struct DeadlineVariables<V> {
    inner: V,
    timeout: Duration,
}

impl<V: Variables> DeadlineVariables<V> {
    /// Wraps `inner` with a per-lookup `timeout`.
    pub const fn new(inner: V, timeout: Duration) -> Self {
        Self { inner, timeout }
    }
}

#[async_trait]
impl<V: Variables> Variables for DeadlineVariables<V> {
    async fn get(&self, name: &str) -> Result<Option<ConfigValue>, VariablesError> {
        if let Ok(result) = tokio::time::timeout(self.timeout, self.inner.get(name)).await {
            result
        } else {
            tracing::warn!(variable = name, timeout_ms = self.timeout.as_millis(), "variable lookup timed out");
            Err(VariablesError::Timeout(self.timeout))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::adapters::StaticVariables;
    use pretty_assertions::assert_eq;

    struct SlowVariables {
        delay: Duration,
    }

    #[async_trait]
    impl Variables for SlowVariables {
        async fn get(&self, name: &str) -> Result<Option<ConfigValue>, VariablesError> {
            tokio::time::sleep(self.delay).await;
            Ok(Some(ConfigValue::from(name)))
        }
    }

    #[tokio::test]
    async fn test_fast_lookup_passes_through() {
        let vars = DeadlineVariables::new(
            StaticVariables::new().with("token", "abc"),
            Duration::from_secs(1),
        );

        assert_eq!(vars.get("token").await, Ok(Some(ConfigValue::from("abc"))));
        assert_eq!(vars.get("other").await, Ok(None));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_lookup_times_out() {
        let timeout = Duration::from_millis(100);
        let vars = DeadlineVariables::new(
            SlowVariables {
                delay: Duration::from_secs(5),
            },
            timeout,
        );

        let result = vars.get("token").await;

        assert_eq!(result, Err(VariablesError::Timeout(timeout)));
        assert!(result.expect_err("timed out").is_systemic());
    }
}
