//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Resolve `((variables))` in pipeline configuration and pause idle pipelines.
#[derive(Debug, Parser)]
#[command(name = "keel", version, about, long_about = None)]
pub struct Cli {
    /// Settings file (defaults to `keel.toml` in the working directory if present)
    #[arg(long, global = true, env = "KEEL_SETTINGS", value_name = "FILE")]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Evaluate a config fragment and print it as JSON
    Evaluate(EvaluateArgs),
    /// Pause pipelines whose jobs have all been idle too long
    Pause(PauseArgs),
}

/// Arguments for `keel evaluate`.
#[derive(Debug, Args)]
pub struct EvaluateArgs {
    /// YAML or JSON config fragment containing `((placeholders))`
    pub config: PathBuf,

    /// Load variables from a YAML/JSON file; later files take precedence
    #[arg(short = 'l', long = "load-vars-from", value_name = "FILE")]
    pub var_files: Vec<PathBuf>,

    /// Set a string variable; overrides var files
    #[arg(short = 'v', long = "var", value_name = "NAME=VALUE")]
    pub vars: Vec<String>,

    /// Set a variable to a YAML value; overrides var files
    #[arg(short = 'y', long = "yaml-var", value_name = "NAME=YAML")]
    pub yaml_vars: Vec<String>,

    /// Print substituted values as ((redacted))
    #[arg(long)]
    pub redacted: bool,

    /// Per-lookup deadline in milliseconds (overrides settings)
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,
}

/// Arguments for `keel pause`.
#[derive(Debug, Args)]
pub struct PauseArgs {
    /// JSON file holding pipelines and their job activity
    #[arg(long, value_name = "FILE")]
    pub pipelines: PathBuf,

    /// Inactivity threshold in days (overrides settings)
    #[arg(long, value_name = "N")]
    pub days: Option<u32>,

    /// Keep running and re-check every interval until Ctrl-C
    #[arg(long)]
    pub watch: bool,

    /// Seconds between checks with --watch (overrides settings)
    #[arg(long, value_name = "SECS")]
    pub interval: Option<u64>,
}
