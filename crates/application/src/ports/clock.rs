//! Clock port for the inactivity pauser

use std::sync::Arc;

use chrono::{DateTime, Utc};

/// Port for getting the current time.
///
/// Idle durations are measured against this clock, so tests can pin "now"
/// and place job activity at exact day offsets.
pub trait Clock: Send + Sync {
    /// Returns the current UTC timestamp.
    fn now(&self) -> DateTime<Utc>;
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}
