//! Records kept in local storage for post-mortem inspection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A caught, non-fatal failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorLogEntry {
    pub timestamp: DateTime<Utc>,
    pub session_id: String,
    /// Where the failure was caught, e.g. `autosave`.
    pub context: String,
    pub message: String,
}

/// A timing sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceEntry {
    pub timestamp: DateTime<Utc>,
    pub metric: String,
    pub millis: u64,
}
