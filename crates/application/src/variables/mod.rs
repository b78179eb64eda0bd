//! Variable resolution module
//!
//! Provides parsing of `((variable))` placeholders, ordered composition of
//! variable sources, and evaluation of whole configuration trees.
//!
//! # Usage
//!
//! ```
//! use keel_application::ports::{Variables, VariablesError};
//! use keel_application::variables::{VariablesChain, evaluate};
//! use keel_domain::ConfigValue;
//!
//! struct Fixed;
//!
//! #[async_trait::async_trait]
//! impl Variables for Fixed {
//!     async fn get(&self, name: &str) -> Result<Option<ConfigValue>, VariablesError> {
//!         Ok((name == "branch").then(|| ConfigValue::from("main")))
//!     }
//! }
//!
//! # tokio_test_block(async {
//! let chain = VariablesChain::new().with("pipeline", Fixed);
//! let raw: ConfigValue = serde_json::from_str(r#"{"branch": "((branch))"}"#).unwrap();
//!
//! let outcome = evaluate(&raw, &chain).await.unwrap();
//! assert_eq!(outcome.result.get("branch"), Some(&ConfigValue::from("main")));
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

pub mod chain;
pub mod evaluator;
pub mod outcome;
pub mod parser;

pub use chain::VariablesChain;
pub use evaluator::{Evaluator, evaluate};
pub use outcome::{
    EvaluationError, EvaluationOutcome, LocatedFailure, Location, REDACTED, ResolutionFailure,
};
pub use parser::{Placeholder, is_placeholder, parse_placeholder, parse_reference};
