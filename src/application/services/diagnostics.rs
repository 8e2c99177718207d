//! Capped diagnostic logs kept in local storage.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, warn};

use crate::domain::entities::{ErrorLogEntry, PerformanceEntry};
use crate::domain::ports::{
    ERROR_LOGS_KEY, JsonStoreExt, KeyValueStorePort, PERFORMANCE_METRICS_KEY,
};

/// Maximum retained error records.
pub const MAX_ERROR_LOGS: usize = 50;
/// Maximum retained timing samples.
pub const MAX_PERFORMANCE_ENTRIES: usize = 100;

/// Appends caught failures to `errorLogs`.
///
/// Reporting never fails: if storage itself is broken the entry is only
/// traced.
#[derive(Clone)]
pub struct ErrorReporter {
    store: Arc<dyn KeyValueStorePort>,
    session_id: String,
}

impl ErrorReporter {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStorePort>, session_id: impl Into<String>) -> Self {
        Self {
            store,
            session_id: session_id.into(),
        }
    }

    /// Records a failure caught in `context`.
    pub fn report(&self, context: &str, error: &dyn std::fmt::Display) {
        warn!(context, error = %error, "Recording caught error");

        let mut entries: Vec<ErrorLogEntry> =
            self.store.get_json(ERROR_LOGS_KEY).unwrap_or_default();
        entries.push(ErrorLogEntry {
            timestamp: Utc::now(),
            session_id: self.session_id.clone(),
            context: context.to_string(),
            message: error.to_string(),
        });
        trim_front(&mut entries, MAX_ERROR_LOGS);

        if let Err(e) = self.store.set_json(ERROR_LOGS_KEY, &entries) {
            debug!(error = %e, "Error log not persisted");
        }
    }

    /// Returns recorded entries, oldest first.
    #[must_use]
    pub fn entries(&self) -> Vec<ErrorLogEntry> {
        self.store.get_json(ERROR_LOGS_KEY).unwrap_or_default()
    }
}

/// Appends timing samples to `performanceMetrics`.
#[derive(Clone)]
pub struct PerformanceRecorder {
    store: Arc<dyn KeyValueStorePort>,
}

impl PerformanceRecorder {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStorePort>) -> Self {
        Self { store }
    }

    /// Records how long `metric` took.
    pub fn record(&self, metric: &str, elapsed: Duration) {
        let mut entries: Vec<PerformanceEntry> =
            self.store.get_json(PERFORMANCE_METRICS_KEY).unwrap_or_default();
        entries.push(PerformanceEntry {
            timestamp: Utc::now(),
            metric: metric.to_string(),
            millis: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        });
        trim_front(&mut entries, MAX_PERFORMANCE_ENTRIES);

        if let Err(e) = self.store.set_json(PERFORMANCE_METRICS_KEY, &entries) {
            debug!(metric, error = %e, "Performance sample not persisted");
        }
    }

    /// Returns recorded samples, oldest first.
    #[must_use]
    pub fn entries(&self) -> Vec<PerformanceEntry> {
        self.store.get_json(PERFORMANCE_METRICS_KEY).unwrap_or_default()
    }
}

fn trim_front<T>(entries: &mut Vec<T>, max: usize) {
    if entries.len() > max {
        let excess = entries.len() - max;
        entries.drain(..excess);
    }
}
