//! Analytics events and summaries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single tracked event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    pub name: String,
    pub path: String,
    pub session_id: String,
    pub occurred_at: DateTime<Utc>,
}

impl AnalyticsEvent {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        path: impl Into<String>,
        session_id: impl Into<String>,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            session_id: session_id.into(),
            occurred_at,
        }
    }
}

/// Views recorded for one path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageViews {
    pub path: String,
    pub views: u64,
}

/// Aggregated traffic numbers shown on the dashboard header.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    pub page_views: u64,
    pub unique_visitors: u64,
    pub lead_submissions: u64,
    pub top_pages: Vec<PageViews>,
}

impl AnalyticsSummary {
    /// Builds a summary from raw events.
    #[must_use]
    pub fn from_events(events: &[AnalyticsEvent]) -> Self {
        use std::collections::{BTreeMap, HashSet};

        let mut per_path: BTreeMap<&str, u64> = BTreeMap::new();
        let mut sessions = HashSet::new();
        let mut page_views = 0;
        let mut lead_submissions = 0;

        for event in events {
            sessions.insert(event.session_id.as_str());
            match event.name.as_str() {
                "page_view" => {
                    page_views += 1;
                    *per_path.entry(event.path.as_str()).or_default() += 1;
                }
                "lead_submitted" => lead_submissions += 1,
                _ => {}
            }
        }

        let mut top_pages: Vec<PageViews> = per_path
            .into_iter()
            .map(|(path, views)| PageViews {
                path: path.to_string(),
                views,
            })
            .collect();
        top_pages.sort_by(|a, b| b.views.cmp(&a.views).then_with(|| a.path.cmp(&b.path)));
        top_pages.truncate(5);

        Self {
            page_views,
            unique_visitors: sessions.len() as u64,
            lead_submissions,
            top_pages,
        }
    }
}
