//! `keel pause`: pause pipelines whose jobs have all been idle too long.

use std::time::Duration;

use anyhow::{Result, bail};
use keel_application::{PausePipelines, PauseReport};
use keel_domain::InactivityThreshold;
use keel_infrastructure::{FilePipelineStore, SystemClock, TokioFileSystem};
use tokio::sync::watch;

use crate::cli::PauseArgs;
use crate::settings::Settings;

/// Runs the pauser once, or until Ctrl-C with `--watch`.
///
/// # Errors
///
/// Fails on an out-of-range threshold, or if a one-shot run fails or leaves
/// an idle pipeline unpaused.
pub async fn run(args: &PauseArgs, settings: &Settings) -> Result<()> {
    let threshold = InactivityThreshold::days(args.days.unwrap_or(settings.pauser.inactivity_days))?;
    let store = FilePipelineStore::new(TokioFileSystem::new(), &args.pipelines);
    let use_case = PausePipelines::new(store, SystemClock::new());

    if !args.watch {
        let report = use_case.execute(threshold).await?;
        print!("{}", summary(&report));
        if !report.failed.is_empty() {
            bail!("{} pipeline(s) could not be paused", report.failed.len());
        }
        return Ok(());
    }

    let interval = Duration::from_secs(args.interval.unwrap_or(settings.pauser.interval_secs).max(1));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::warn!(%error, "cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
        shutdown_tx.send_replace(true);
    });

    tracing::info!(
        pipelines = %args.pipelines.display(),
        %threshold,
        interval_secs = interval.as_secs(),
        "watching for inactive pipelines"
    );
    use_case.run_periodically(interval, threshold, shutdown_rx).await;
    Ok(())
}

/// Renders a run report for stdout.
fn summary(report: &PauseReport) -> String {
    let mut out = format!(
        "checked {} pipeline(s): paused {}, already paused {}, failed {}\n",
        report.checked,
        report.paused.len(),
        report.already_paused,
        report.failed.len()
    );
    for pipeline in &report.paused {
        out.push_str(&format!("  paused {pipeline}\n"));
    }
    for failure in &report.failed {
        out.push_str(&format!("  failed {}: {}\n", failure.pipeline, failure.reason));
    }
    out
}
