//! Use cases
//!
//! Application services that orchestrate domain logic through ports.

mod evaluate_config;
mod pause_pipelines;

pub use evaluate_config::{EvaluateConfig, EvaluateConfigInput};
pub use pause_pipelines::{PauseFailure, PauseReport, PausePipelines};
