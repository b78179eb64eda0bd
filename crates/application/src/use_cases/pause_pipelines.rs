//! Pause inactive pipelines use case
//!
//! Pauses every pipeline whose jobs have all gone unscheduled for longer
//! than a threshold. Works purely through the pipeline store; credential
//! state is never consulted.

use std::time::Duration;

use keel_domain::{InactivityThreshold, PipelineRef};
use tokio::sync::watch;

use crate::error::ApplicationResult;
use crate::ports::{Clock, PipelineStore};

/// Summary of one pauser run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PauseReport {
    /// Number of pipelines inspected.
    pub checked: usize,
    /// Pipelines paused by this run.
    pub paused: Vec<PipelineRef>,
    /// Pipelines that were already paused and left alone.
    pub already_paused: usize,
    /// Idle pipelines the store refused to pause.
    pub failed: Vec<PauseFailure>,
}

/// An idle pipeline that could not be paused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PauseFailure {
    /// The pipeline.
    pub pipeline: PipelineRef,
    /// The store's error message.
    pub reason: String,
}

/// Pauses pipelines that have been inactive past a threshold.
pub struct PausePipelines<S, C> {
    store: S,
    clock: C,
}

impl<S: PipelineStore, C: Clock> PausePipelines<S, C> {
    /// Creates a new `PausePipelines` use case.
    pub const fn new(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    /// Executes the use case once.
    ///
    /// A pipeline is paused when it is unpaused, has at least one job, and
    /// every job has been idle for strictly longer than `threshold`.
    /// Running it again on already paused pipelines changes nothing.
    ///
    /// A pipeline the store refuses to pause is recorded in
    /// [`PauseReport::failed`] and the run carries on with the rest.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read.
    pub async fn execute(&self, threshold: InactivityThreshold) -> ApplicationResult<PauseReport> {
        let now = self.clock.now();
        let pipelines = self.store.pipelines().await?;

        let mut report = PauseReport {
            checked: pipelines.len(),
            ..PauseReport::default()
        };

        for activity in pipelines {
            if activity.paused {
                report.already_paused += 1;
                continue;
            }
            if !activity.is_inactive(threshold, now) {
                continue;
            }

            match self.store.pause(&activity.pipeline).await {
                Ok(()) => {
                    tracing::info!(
                        team = %activity.pipeline.team,
                        pipeline = %activity.pipeline.name,
                        %threshold,
                        "paused inactive pipeline"
                    );
                    report.paused.push(activity.pipeline);
                }
                Err(error) => {
                    tracing::warn!(
                        team = %activity.pipeline.team,
                        pipeline = %activity.pipeline.name,
                        %error,
                        "failed to pause inactive pipeline"
                    );
                    report.failed.push(PauseFailure {
                        pipeline: activity.pipeline,
                        reason: error.to_string(),
                    });
                }
            }
        }

        tracing::debug!(
            checked = report.checked,
            paused = report.paused.len(),
            already_paused = report.already_paused,
            failed = report.failed.len(),
            "pipeline pauser run finished"
        );
        Ok(report)
    }

    /// Runs [`Self::execute`] every `interval` until `shutdown` flips to `true`
    /// or its sender is dropped.
    ///
    /// The first run happens immediately. A failed run is logged and the next
    /// tick tries again.
    pub async fn run_periodically(
        &self,
        interval: Duration,
        threshold: InactivityThreshold,
        mut shutdown: watch::Receiver<bool>,
    ) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            if *shutdown.borrow() {
                break;
            }

            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(error) = self.execute(threshold).await {
                        tracing::error!(%error, "pipeline pauser run failed");
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        tracing::info!("pipeline pauser stopped");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::error::ApplicationError;
    use crate::ports::PipelineStoreError;
    use async_trait::async_trait;
    use chrono::{DateTime, TimeDelta, Utc};
    use keel_domain::{JobActivity, PipelineActivity};
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    #[derive(Clone, Default)]
    struct MockStore {
        pipelines: Arc<Mutex<Vec<PipelineActivity>>>,
        pause_calls: Arc<Mutex<usize>>,
        vanished: Vec<String>,
    }

    impl MockStore {
        fn with(pipelines: Vec<PipelineActivity>) -> Self {
            Self {
                pipelines: Arc::new(Mutex::new(pipelines)),
                pause_calls: Arc::default(),
                vanished: Vec::new(),
            }
        }

        /// Listed by `pipelines()` but gone by the time `pause` is called.
        fn vanishing(mut self, name: &str) -> Self {
            self.vanished.push(name.to_string());
            self
        }

        fn is_paused(&self, name: &str) -> bool {
            self.pipelines
                .lock()
                .expect("lock")
                .iter()
                .find(|p| p.pipeline.name == name)
                .is_some_and(|p| p.paused)
        }
    }

    #[async_trait]
    impl PipelineStore for MockStore {
        async fn pipelines(&self) -> Result<Vec<PipelineActivity>, PipelineStoreError> {
            Ok(self.pipelines.lock().expect("lock").clone())
        }

        async fn pause(&self, pipeline: &PipelineRef) -> Result<(), PipelineStoreError> {
            *self.pause_calls.lock().expect("lock") += 1;
            if self.vanished.contains(&pipeline.name) {
                return Err(PipelineStoreError::NotFound(pipeline.clone()));
            }
            let mut pipelines = self.pipelines.lock().expect("lock");
            let found = pipelines
                .iter_mut()
                .find(|p| &p.pipeline == pipeline)
                .ok_or_else(|| PipelineStoreError::NotFound(pipeline.clone()))?;
            found.paused = true;
            Ok(())
        }
    }

    struct BrokenStore;

    #[async_trait]
    impl PipelineStore for BrokenStore {
        async fn pipelines(&self) -> Result<Vec<PipelineActivity>, PipelineStoreError> {
            Err(PipelineStoreError::Serialization("corrupt".into()))
        }

        async fn pause(&self, _pipeline: &PipelineRef) -> Result<(), PipelineStoreError> {
            Ok(())
        }
    }

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-06-01T00:00:00Z")
            .expect("valid timestamp")
            .with_timezone(&Utc)
    }

    fn two_job_pipeline(name: &str, first_days_ago: i64, second_days_ago: i64) -> PipelineActivity {
        PipelineActivity::new(
            PipelineRef::new("main", name),
            vec![
                JobActivity::scheduled_at("job-one", now() - TimeDelta::days(first_days_ago)),
                JobActivity::scheduled_at("job-two", now() - TimeDelta::days(second_days_ago)),
            ],
        )
    }

    fn ten_days() -> InactivityThreshold {
        InactivityThreshold::days(10).expect("valid threshold")
    }

    #[tokio::test]
    async fn test_pauses_pipeline_idle_past_threshold() {
        let store = MockStore::with(vec![two_job_pipeline("twojobs-pipeline", 15, 20)]);
        let use_case = PausePipelines::new(store.clone(), FixedClock(now()));

        let report = use_case.execute(ten_days()).await.expect("runs");

        assert!(store.is_paused("twojobs-pipeline"));
        assert_eq!(report.paused, vec![PipelineRef::new("main", "twojobs-pipeline")]);
        assert_eq!(report.checked, 1);
    }

    #[tokio::test]
    async fn test_recent_job_keeps_pipeline_running() {
        let store = MockStore::with(vec![two_job_pipeline("twojobs-pipeline", 1, 11)]);
        let use_case = PausePipelines::new(store.clone(), FixedClock(now()));

        let report = use_case.execute(ten_days()).await.expect("runs");

        assert!(!store.is_paused("twojobs-pipeline"));
        assert!(report.paused.is_empty());
    }

    #[tokio::test]
    async fn test_exact_threshold_is_not_idle() {
        let store = MockStore::with(vec![two_job_pipeline("twojobs-pipeline", 10, 20)]);
        let use_case = PausePipelines::new(store.clone(), FixedClock(now()));

        use_case.execute(ten_days()).await.expect("runs");

        assert!(!store.is_paused("twojobs-pipeline"));
    }

    #[tokio::test]
    async fn test_rerun_is_a_no_op() {
        let store = MockStore::with(vec![two_job_pipeline("twojobs-pipeline", 15, 20)]);
        let use_case = PausePipelines::new(store.clone(), FixedClock(now()));

        use_case.execute(ten_days()).await.expect("first run");
        let second = use_case.execute(ten_days()).await.expect("second run");

        assert!(store.is_paused("twojobs-pipeline"));
        assert!(second.paused.is_empty());
        assert_eq!(second.already_paused, 1);
        assert_eq!(*store.pause_calls.lock().expect("lock"), 1);
    }

    #[tokio::test]
    async fn test_only_idle_pipelines_are_paused() {
        let store = MockStore::with(vec![
            two_job_pipeline("idle", 30, 40),
            two_job_pipeline("busy", 0, 40),
            PipelineActivity::new(PipelineRef::new("main", "no-jobs"), Vec::new()),
        ]);
        let use_case = PausePipelines::new(store.clone(), FixedClock(now()));

        let report = use_case.execute(ten_days()).await.expect("runs");

        assert_eq!(report.paused, vec![PipelineRef::new("main", "idle")]);
        assert!(!store.is_paused("busy"));
        assert!(!store.is_paused("no-jobs"));
    }

    #[tokio::test]
    async fn test_failed_pause_does_not_stop_the_run() {
        let store = MockStore::with(vec![
            two_job_pipeline("deleted-mid-run", 30, 40),
            two_job_pipeline("idle", 30, 40),
        ])
        .vanishing("deleted-mid-run");
        let use_case = PausePipelines::new(store.clone(), FixedClock(now()));

        let report = use_case.execute(ten_days()).await.expect("runs");

        assert_eq!(report.paused, vec![PipelineRef::new("main", "idle")]);
        assert!(store.is_paused("idle"));
        assert_eq!(report.failed.len(), 1);
        assert_eq!(
            report.failed[0].pipeline,
            PipelineRef::new("main", "deleted-mid-run")
        );
        assert!(report.failed[0].reason.contains("deleted-mid-run"));
    }

    #[tokio::test]
    async fn test_store_failure_is_propagated() {
        let use_case = PausePipelines::new(BrokenStore, FixedClock(now()));

        let error = use_case.execute(ten_days()).await.expect_err("fails");
        assert!(matches!(error, ApplicationError::PipelineStore(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_periodically_stops_on_shutdown() {
        let store = MockStore::with(vec![two_job_pipeline("twojobs-pipeline", 15, 20)]);
        let use_case = PausePipelines::new(store.clone(), FixedClock(now()));
        let (tx, rx) = watch::channel(false);

        let runner = async {
            use_case
                .run_periodically(Duration::from_secs(60), ten_days(), rx)
                .await;
        };
        let stopper = async {
            tokio::time::sleep(Duration::from_secs(150)).await;
            tx.send(true).expect("receiver alive");
        };
        tokio::join!(runner, stopper);

        assert!(store.is_paused("twojobs-pipeline"));
        // Ticks at 0s, 60s and 120s; only the first one pauses anything.
        assert_eq!(*store.pause_calls.lock().expect("lock"), 1);
    }
}
