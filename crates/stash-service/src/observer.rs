//! Lookup observability hook.
//!
//! Every call to [`UserLookupService::get_user`](crate::UserLookupService::get_user)
//! reports exactly one [`LookupEvent`] to the configured [`LookupObserver`].

use metrics::{counter, describe_counter, describe_histogram, histogram};
use shaku::{Component, Interface};
use stash_core::UserId;
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};

/// Metric names for user lookups.
pub mod names {
    /// Total lookups by outcome.
    pub const USER_LOOKUPS_TOTAL: &str = "stash_user_lookups_total";
    /// Lookup latency in seconds.
    pub const USER_LOOKUP_DURATION_SECONDS: &str = "stash_user_lookup_duration_seconds";
}

/// Register metric descriptions.
pub fn register_metrics() {
    describe_counter!(
        names::USER_LOOKUPS_TOTAL,
        "Total number of user lookups by outcome"
    );
    describe_histogram!(
        names::USER_LOOKUP_DURATION_SECONDS,
        "User lookup latency in seconds"
    );
}

/// How a lookup was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupOutcome {
    /// Served from the cache.
    Hit,
    /// Loaded from the store and written to the cache.
    Miss,
    /// Absent from both cache and store.
    NotFound,
    /// Failed with an error.
    Error,
}

impl LookupOutcome {
    /// Label value used in logs and metrics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hit => "hit",
            Self::Miss => "miss",
            Self::NotFound => "not_found",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for LookupOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A completed lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupEvent {
    /// Requested id.
    pub id: UserId,
    /// Resolution.
    pub outcome: LookupOutcome,
    /// Wall time spent in the lookup.
    pub latency: Duration,
}

/// Receives one event per lookup.
///
/// Implementations must be cheap and must not fail.
pub trait LookupObserver: Interface + Send + Sync {
    /// Called after a lookup finishes.
    fn on_lookup(&self, event: &LookupEvent);
}

/// Observer that logs each lookup and optionally records Prometheus metrics.
#[derive(Component, Debug)]
#[shaku(interface = LookupObserver)]
pub struct TracingLookupObserver {
    #[shaku(default = true)]
    metrics_enabled: bool,
}

impl TracingLookupObserver {
    /// Creates an observer; `metrics_enabled` toggles the metrics recording.
    #[must_use]
    pub const fn new(metrics_enabled: bool) -> Self {
        Self { metrics_enabled }
    }
}

impl Default for TracingLookupObserver {
    fn default() -> Self {
        Self::new(true)
    }
}

impl LookupObserver for TracingLookupObserver {
    fn on_lookup(&self, event: &LookupEvent) {
        match event.outcome {
            LookupOutcome::Error => warn!(
                id = %event.id,
                latency = ?event.latency,
                "User lookup failed"
            ),
            outcome => debug!(
                id = %event.id,
                outcome = %outcome,
                latency = ?event.latency,
                "User lookup completed"
            ),
        }

        if self.metrics_enabled {
            counter!(names::USER_LOOKUPS_TOTAL, "outcome" => event.outcome.as_str()).increment(1);
            histogram!(
                names::USER_LOOKUP_DURATION_SECONDS,
                "outcome" => event.outcome.as_str()
            )
            .record(event.latency.as_secs_f64());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use metrics_exporter_prometheus::PrometheusBuilder;

    #[test]
    fn test_outcome_labels() {
        assert_eq!(LookupOutcome::Hit.as_str(), "hit");
        assert_eq!(LookupOutcome::Miss.as_str(), "miss");
        assert_eq!(LookupOutcome::NotFound.to_string(), "not_found");
        assert_eq!(LookupOutcome::Error.to_string(), "error");
    }

    fn miss_event(id: i64) -> LookupEvent {
        LookupEvent {
            id: UserId::new(id),
            outcome: LookupOutcome::Miss,
            latency: Duration::from_millis(3),
        }
    }

    #[test]
    fn test_observer_records_outcome_metrics() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        let observer = TracingLookupObserver::default();

        metrics::with_local_recorder(&recorder, || observer.on_lookup(&miss_event(1)));

        let rendered = handle.render();
        assert!(rendered.contains(r#"stash_user_lookups_total{outcome="miss"} 1"#));
        assert!(rendered.contains(r#"stash_user_lookup_duration_seconds_count{outcome="miss"} 1"#));
    }

    #[test]
    fn test_disabled_observer_records_nothing() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        let observer = TracingLookupObserver::new(false);

        metrics::with_local_recorder(&recorder, || observer.on_lookup(&miss_event(2)));

        assert!(!handle.render().contains(names::USER_LOOKUPS_TOTAL));
    }
}
