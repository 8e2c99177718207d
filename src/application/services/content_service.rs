//! Post and analytics access with demo-data substitution.

use std::sync::Arc;

use tracing::{info, warn};

use crate::application::services::diagnostics::ErrorReporter;
use crate::domain::entities::{AnalyticsSummary, BlogPost, PostId};
use crate::domain::errors::ContentError;
use crate::domain::ports::{AnalyticsPort, ContentBackend, ContentStorePort};

/// A read result tagged with whether it is placeholder data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sourced<T> {
    pub value: T,
    pub demo: bool,
}

impl<T> Sourced<T> {
    #[must_use]
    pub const fn live(value: T) -> Self {
        Self { value, demo: false }
    }

    #[must_use]
    pub const fn demo(value: T) -> Self {
        Self { value, demo: true }
    }
}

/// Reads go to the primary store; failures fall back to demo data. Saves fall
/// back to local storage when the primary is unreachable.
#[derive(Clone)]
pub struct ContentService {
    primary: Arc<dyn ContentStorePort>,
    demo: Arc<dyn ContentStorePort>,
    local: Option<Arc<dyn ContentStorePort>>,
    analytics: Arc<dyn AnalyticsPort>,
    demo_analytics: Arc<dyn AnalyticsPort>,
    reporter: ErrorReporter,
}

impl ContentService {
    #[must_use]
    pub fn new(
        primary: Arc<dyn ContentStorePort>,
        demo: Arc<dyn ContentStorePort>,
        analytics: Arc<dyn AnalyticsPort>,
        demo_analytics: Arc<dyn AnalyticsPort>,
        reporter: ErrorReporter,
    ) -> Self {
        Self {
            primary,
            demo,
            local: None,
            analytics,
            demo_analytics,
            reporter,
        }
    }

    /// Store used for saves when the primary cannot be reached.
    #[must_use]
    pub fn with_local_fallback(mut self, local: Arc<dyn ContentStorePort>) -> Self {
        self.local = Some(local);
        self
    }

    /// Backend that receives writes.
    #[must_use]
    pub fn backend(&self) -> ContentBackend {
        self.primary.backend()
    }

    /// Returns true if the primary store itself serves placeholder content.
    #[must_use]
    pub fn is_demo(&self) -> bool {
        self.primary.backend() == ContentBackend::Demo
    }

    pub fn analytics(&self) -> &Arc<dyn AnalyticsPort> {
        &self.analytics
    }

    /// Lists posts, newest first.
    ///
    /// # Errors
    /// Returns error only if the demo store also fails.
    pub async fn list_posts(&self) -> Result<Sourced<Vec<BlogPost>>, ContentError> {
        match self.primary.list_posts().await {
            Ok(posts) => Ok(self.tag(posts)),
            Err(e) => {
                self.reporter.report("list_posts", &e);
                warn!(error = %e, "Listing posts failed, serving demo data");
                Ok(Sourced::demo(self.demo.list_posts().await?))
            }
        }
    }

    /// Fetches one post.
    ///
    /// # Errors
    /// Returns error only if the demo store also fails.
    pub async fn get_post(&self, id: &PostId) -> Result<Sourced<Option<BlogPost>>, ContentError> {
        match self.primary.get_post(id).await {
            Ok(post) => Ok(self.tag(post)),
            Err(e) => {
                self.reporter.report("get_post", &e);
                Ok(Sourced::demo(self.demo.get_post(id).await?))
            }
        }
    }

    /// Saves a post and returns the backend that accepted it.
    ///
    /// # Errors
    /// Returns error if the primary rejects the post, or if it is unreachable
    /// and no local fallback accepts it either.
    pub async fn save_post(&self, post: &BlogPost) -> Result<ContentBackend, ContentError> {
        match self.primary.save_post(post).await {
            Ok(()) => Ok(self.primary.backend()),
            Err(e) if e.is_unreachable() => {
                let Some(local) = &self.local else {
                    return Err(e);
                };
                self.reporter.report("save_post", &e);
                local.save_post(post).await?;
                info!(post_id = %post.id, "Primary store unreachable, saved locally");
                Ok(local.backend())
            }
            Err(e) => Err(e),
        }
    }

    /// Deletes a post from the primary store.
    ///
    /// # Errors
    /// Returns error if the store refuses.
    pub async fn delete_post(&self, id: &PostId) -> Result<(), ContentError> {
        self.primary.delete_post(id).await
    }

    /// Aggregated analytics, or the demo numbers when unavailable.
    ///
    /// # Errors
    /// Returns error only if the demo adapter also fails.
    pub async fn analytics_summary(&self) -> Result<Sourced<AnalyticsSummary>, ContentError> {
        match self.analytics.summary().await {
            Ok(summary) if self.analytics.is_demo() => Ok(Sourced::demo(summary)),
            Ok(summary) => Ok(Sourced::live(summary)),
            Err(e) => {
                self.reporter.report("analytics_summary", &e);
                Ok(Sourced::demo(self.demo_analytics.summary().await?))
            }
        }
    }

    fn tag<T>(&self, value: T) -> Sourced<T> {
        if self.is_demo() {
            Sourced::demo(value)
        } else {
            Sourced::live(value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::PostFields;
    use crate::domain::ports::mocks::MockContentStore;
    use crate::infrastructure::content::{DemoAnalytics, DemoContentStore, LocalContentStore};
    use crate::infrastructure::storage::MemoryKeyValueStore;
    use chrono::Utc;

    fn service(primary: Arc<dyn ContentStorePort>) -> (ContentService, ErrorReporter) {
        let kv = Arc::new(MemoryKeyValueStore::new());
        let reporter = ErrorReporter::new(kv.clone(), "s");
        let service = ContentService::new(
            primary,
            Arc::new(DemoContentStore::new()),
            Arc::new(DemoAnalytics),
            Arc::new(DemoAnalytics),
            reporter.clone(),
        )
        .with_local_fallback(Arc::new(LocalContentStore::new(kv)));
        (service, reporter)
    }

    fn post() -> BlogPost {
        BlogPost::create(
            PostFields {
                title: "A post worth saving".to_string(),
                ..PostFields::default()
            },
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn test_reachable_primary_is_live() -> Result<(), ContentError> {
        let primary = Arc::new(MockContentStore::new());
        let (service, _) = service(primary);

        let listed = service.list_posts().await?;
        assert!(!listed.demo);
        assert!(listed.value.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_failing_primary_serves_demo_and_logs() -> Result<(), ContentError> {
        let (service, reporter) = service(Arc::new(MockContentStore::offline()));

        let listed = service.list_posts().await?;
        assert!(listed.demo);
        assert_eq!(listed.value.len(), 3);
        assert_eq!(reporter.entries()[0].context, "list_posts");
        Ok(())
    }

    #[tokio::test]
    async fn test_unreachable_primary_saves_locally() -> Result<(), ContentError> {
        let (service, _) = service(Arc::new(MockContentStore::offline()));

        let backend = service.save_post(&post()).await?;
        assert_eq!(backend, ContentBackend::Local);
        Ok(())
    }

    #[tokio::test]
    async fn test_get_post_tags_demo_fallback() -> Result<(), ContentError> {
        let primary = Arc::new(MockContentStore::new());
        let saved = post();
        primary.save_post(&saved).await?;
        let (live, _) = service(primary);
        let found = live.get_post(&saved.id).await?;
        assert!(!found.demo);
        assert_eq!(found.value, Some(saved.clone()));

        let (offline, _) = service(Arc::new(MockContentStore::offline()));
        let missing = offline.get_post(&saved.id).await?;
        assert!(missing.demo);
        assert!(missing.value.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_demo_analytics_summary_is_flagged() -> Result<(), ContentError> {
        let (service, _) = service(Arc::new(MockContentStore::new()));
        let summary = service.analytics_summary().await?;
        assert!(summary.demo);
        assert!(summary.value.page_views > 0);
        Ok(())
    }
}
