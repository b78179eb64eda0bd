//! Layered settings: built-in defaults, then a settings file, then
//! `KEEL_*` environment variables.
//!
//! Nested keys use `__` in the environment, e.g.
//! `KEEL_PAUSER__INACTIVITY_DAYS=30`.

use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Default file looked up in the working directory (`keel.toml`, `keel.yaml`, ...).
const DEFAULT_FILE: &str = "keel";

/// Runtime settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// Log filter directive used when `RUST_LOG` is unset.
    pub log_filter: String,
    /// Per-lookup deadline for variable backends, in milliseconds.
    #[serde(default)]
    pub resolver_timeout_ms: Option<u64>,
    /// Inactivity pauser settings.
    pub pauser: PauserSettings,
}

/// Settings for `keel pause`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PauserSettings {
    /// Days without a scheduled job before a pipeline is paused.
    pub inactivity_days: u32,
    /// Seconds between runs in watch mode.
    pub interval_secs: u64,
}

impl Settings {
    /// Loads settings from `file` (or `keel.*` in the working directory when
    /// `None`) and the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit file is missing or any layer holds a
    /// value of the wrong type.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with(file, environment())
    }

    fn load_with(file: Option<&Path>, env: Environment) -> Result<Self, ConfigError> {
        let file_source = match file {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_FILE).required(false),
        };

        Config::builder()
            .set_default("log_filter", "info")?
            .set_default("pauser.inactivity_days", 10_i64)?
            .set_default("pauser.interval_secs", 3600_i64)?
            .add_source(file_source)
            .add_source(env)
            .build()?
            .try_deserialize()
    }
}

fn environment() -> Environment {
    Environment::with_prefix("KEEL")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}
