//! Keel Domain - Core types
//!
//! This crate defines the domain model for pipeline credential resolution:
//! the untyped configuration tree, parsed variable references and the
//! pipeline activity view used by the inactivity pauser.
//! All types here are pure Rust with no I/O dependencies.

pub mod error;
pub mod pipeline;
pub mod reference;
pub mod value;

pub use error::{DomainError, DomainResult};
pub use pipeline::{InactivityThreshold, JobActivity, PipelineActivity, PipelineRef};
pub use reference::Reference;
pub use value::{ConfigMap, ConfigValue};
