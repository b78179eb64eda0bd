//! Subcommand implementations.

pub mod evaluate;
pub mod pause;
