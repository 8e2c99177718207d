//! Port for the analytics event stream.

use async_trait::async_trait;

use crate::domain::entities::{AnalyticsEvent, AnalyticsSummary};
use crate::domain::errors::ContentError;

/// Port for recording and summarizing site analytics.
#[async_trait]
pub trait AnalyticsPort: Send + Sync {
    /// Appends an event to the stream.
    async fn record(&self, event: &AnalyticsEvent) -> Result<(), ContentError>;

    /// Aggregates recorded events.
    async fn summary(&self) -> Result<AnalyticsSummary, ContentError>;

    /// Returns true if results are placeholder data.
    fn is_demo(&self) -> bool {
        false
    }
}
