//! Pipeline activity types used by the inactivity pauser
//!
//! The pauser only ever sees this narrow view of a pipeline: its identity,
//! whether it is paused, and when each of its jobs was last scheduled.

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Identifies a pipeline within a team.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PipelineRef {
    /// Owning team.
    pub team: String,
    /// Pipeline name, unique within the team.
    pub name: String,
}

impl PipelineRef {
    /// Creates a new pipeline reference.
    #[must_use]
    pub fn new(team: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            team: team.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for PipelineRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.team, self.name)
    }
}

/// Scheduling activity of a single job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobActivity {
    /// Job name.
    pub name: String,
    /// When the job was last scheduled. `None` if it never was.
    #[serde(default)]
    pub last_scheduled: Option<DateTime<Utc>>,
}

impl JobActivity {
    /// Creates a job that was last scheduled at `at`.
    #[must_use]
    pub fn scheduled_at(name: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            last_scheduled: Some(at),
        }
    }

    /// Creates a job that has never been scheduled.
    #[must_use]
    pub fn never_scheduled(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            last_scheduled: None,
        }
    }

    /// Returns true if the job has been idle for strictly longer than `threshold`.
    ///
    /// A job that was never scheduled is idle.
    #[must_use]
    pub fn is_idle(&self, threshold: InactivityThreshold, now: DateTime<Utc>) -> bool {
        self.last_scheduled
            .is_none_or(|at| now.signed_duration_since(at) > threshold.as_duration())
    }
}

/// A pipeline together with the activity of all its jobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineActivity {
    /// Which pipeline this is.
    #[serde(flatten)]
    pub pipeline: PipelineRef,
    /// Whether the pipeline is currently paused.
    #[serde(default)]
    pub paused: bool,
    /// Activity of every job in the pipeline.
    #[serde(default)]
    pub jobs: Vec<JobActivity>,
}

impl PipelineActivity {
    /// Creates an unpaused pipeline with the given jobs.
    #[must_use]
    pub const fn new(pipeline: PipelineRef, jobs: Vec<JobActivity>) -> Self {
        Self {
            pipeline,
            paused: false,
            jobs,
        }
    }

    /// Returns true if every job is idle past `threshold`.
    ///
    /// A pipeline without jobs has no activity to judge and is never
    /// considered inactive.
    #[must_use]
    pub fn is_inactive(&self, threshold: InactivityThreshold, now: DateTime<Utc>) -> bool {
        !self.jobs.is_empty() && self.jobs.iter().all(|job| job.is_idle(threshold, now))
    }

    /// Returns true if the pipeline is unpaused and inactive, i.e. should be paused now.
    #[must_use]
    pub fn should_pause(&self, threshold: InactivityThreshold, now: DateTime<Utc>) -> bool {
        !self.paused && self.is_inactive(threshold, now)
    }
}

/// Number of whole days a pipeline's jobs must all exceed before it is paused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InactivityThreshold {
    days: u32,
}

impl InactivityThreshold {
    /// Largest accepted threshold, roughly one hundred years.
    pub const MAX_DAYS: u32 = 36_500;

    /// Creates a threshold of `days` days.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidThreshold` if `days` is zero or above
    /// [`Self::MAX_DAYS`].
    pub fn days(days: u32) -> DomainResult<Self> {
        if days == 0 {
            return Err(DomainError::InvalidThreshold(
                "threshold must be at least one day".to_string(),
            ));
        }
        if days > Self::MAX_DAYS {
            return Err(DomainError::InvalidThreshold(format!(
                "threshold of {days} days exceeds {} days",
                Self::MAX_DAYS
            )));
        }
        Ok(Self { days })
    }

    /// The threshold in days.
    #[must_use]
    pub const fn as_days(self) -> u32 {
        self.days
    }

    /// The threshold as a duration.
    #[must_use]
    pub fn as_duration(self) -> TimeDelta {
        TimeDelta::days(i64::from(self.days))
    }
}

impl fmt::Display for InactivityThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} days", self.days)
    }
}
