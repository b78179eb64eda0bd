//! `keel evaluate`: resolve a config fragment against local variables.

use std::time::Duration;

use anyhow::{Context, Result};
use keel_application::ports::{FileSystem, Variables};
use keel_application::{EvaluateConfig, EvaluateConfigInput, EvaluationOutcome, VariablesChain};
use keel_infrastructure::{
    DeadlineVariables, StaticVariables, TokioFileSystem, VarFileLoader, parse_config,
    to_json_stable,
};

use crate::cli::EvaluateArgs;
use crate::settings::Settings;

/// Label of the layer holding `-v`/`-y` assignments.
const COMMAND_LINE_LAYER: &str = "command line";

/// Runs the command, printing the evaluated fragment to stdout.
///
/// # Errors
///
/// Fails on unreadable input, malformed assignments, or any unresolved reference.
pub async fn run(args: &EvaluateArgs, settings: &Settings) -> Result<()> {
    print!("{}", render(args, settings).await?);
    Ok(())
}

/// Evaluates the fragment and renders it as stable JSON.
async fn render(args: &EvaluateArgs, settings: &Settings) -> Result<String> {
    let fs = TokioFileSystem::new();
    let bytes = fs
        .read_file(&args.config)
        .await
        .with_context(|| format!("cannot read {}", args.config.display()))?;
    let config = parse_config(&bytes)
        .with_context(|| format!("cannot parse {}", args.config.display()))?;

    let chain = build_chain(args, fs).await?;
    let input = EvaluateConfigInput::new(args.config.display().to_string(), config);

    let timeout = args
        .timeout_ms
        .or(settings.resolver_timeout_ms)
        .map(Duration::from_millis);
    let outcome = match timeout {
        Some(timeout) => evaluate(DeadlineVariables::new(chain, timeout), &input).await?,
        None => evaluate(chain, &input).await?,
    };

    let printed = if args.redacted {
        outcome.redacted_result()
    } else {
        outcome.result
    };
    Ok(to_json_stable(&printed)?)
}

async fn evaluate<V: Variables>(
    variables: V,
    input: &EvaluateConfigInput,
) -> Result<EvaluationOutcome> {
    Ok(EvaluateConfig::new(variables).execute(input).await?)
}

/// Builds the lookup order: command-line assignments first, then var files
/// from last to first.
async fn build_chain(args: &EvaluateArgs, fs: TokioFileSystem) -> Result<VariablesChain> {
    let mut assigned = StaticVariables::new();
    for assignment in &args.vars {
        assigned.assign(assignment)?;
    }
    for assignment in &args.yaml_vars {
        assigned.assign_yaml(assignment)?;
    }

    let mut chain = VariablesChain::new().with(COMMAND_LINE_LAYER, assigned);
    let loader = VarFileLoader::new(fs);
    for path in args.var_files.iter().rev() {
        let vars = loader.load(path).await?;
        chain = chain.with(path.display().to_string(), vars);
    }

    tracing::debug!(layers = ?chain.labels(), "variable layers");
    Ok(chain)
}
