//! Deterministic placeholder content used when the hosted store is absent.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use tokio::sync::RwLock;

use crate::domain::entities::{
    AnalyticsEvent, AnalyticsSummary, BlogPost, PageViews, PostFields, PostId, parse_tags,
};
use crate::domain::errors::ContentError;
use crate::domain::ports::{AnalyticsPort, ContentBackend, ContentStorePort};

fn demo_timestamp(month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, month, day, 9, 0, 0)
        .single()
        .unwrap_or_default()
}

fn demo_post(
    id: &str,
    title: &str,
    excerpt: &str,
    category: &str,
    tags: &str,
    created: DateTime<Utc>,
) -> BlogPost {
    let body = format!(
        "# {title}\n\n{excerpt}\n\n\
         This is demo content shown while the content store is unavailable."
    );
    BlogPost {
        id: PostId::new(id),
        fields: PostFields {
            title: title.to_string(),
            excerpt: excerpt.to_string(),
            body,
            image: format!("https://images.unsplash.com/photo-demo-{id}?w=1200"),
            tags: parse_tags(tags),
            category: category.to_string(),
            published: true,
            read_time: Some("1 min read".to_string()),
        },
        created_at: created,
        updated_at: created,
    }
}

/// The fixed set of demo posts, newest first.
#[must_use]
pub fn demo_posts() -> Vec<BlogPost> {
    vec![
        demo_post(
            "demo-3",
            "What we look for in a founding team",
            "The traits that predict whether a studio-built company survives its first eighteen months.",
            "insights",
            "founders, hiring",
            demo_timestamp(5, 14),
        ),
        demo_post(
            "demo-2",
            "Validating a market in six weeks",
            "Our playbook for turning a hunch into a fundable thesis with customer interviews and smoke tests.",
            "playbooks",
            "validation, research",
            demo_timestamp(4, 2),
        ),
        demo_post(
            "demo-1",
            "Why we build companies instead of funding them",
            "A venture studio shares talent, capital and infrastructure across every company it starts.",
            "venture-building",
            "studio, startups",
            demo_timestamp(3, 1),
        ),
    ]
}

/// Content store serving [`demo_posts`].
///
/// Writes are accepted for the lifetime of the process and never persisted.
pub struct DemoContentStore {
    posts: RwLock<Vec<BlogPost>>,
}

impl DemoContentStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            posts: RwLock::new(demo_posts()),
        }
    }
}

impl Default for DemoContentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentStorePort for DemoContentStore {
    fn backend(&self) -> ContentBackend {
        ContentBackend::Demo
    }

    async fn list_posts(&self) -> Result<Vec<BlogPost>, ContentError> {
        Ok(self.posts.read().await.clone())
    }

    async fn get_post(&self, id: &PostId) -> Result<Option<BlogPost>, ContentError> {
        Ok(self.posts.read().await.iter().find(|p| &p.id == id).cloned())
    }

    async fn save_post(&self, post: &BlogPost) -> Result<(), ContentError> {
        let mut posts = self.posts.write().await;
        posts.retain(|p| p.id != post.id);
        posts.insert(0, post.clone());
        Ok(())
    }

    async fn delete_post(&self, id: &PostId) -> Result<(), ContentError> {
        self.posts.write().await.retain(|p| &p.id != id);
        Ok(())
    }
}

/// Analytics adapter returning a hardcoded summary.
#[derive(Debug, Default)]
pub struct DemoAnalytics;

impl DemoAnalytics {
    /// The mock numbers shown in demo mode.
    #[must_use]
    pub fn mock_summary() -> AnalyticsSummary {
        AnalyticsSummary {
            page_views: 12_480,
            unique_visitors: 3_215,
            lead_submissions: 47,
            top_pages: vec![
                PageViews {
                    path: "/".to_string(),
                    views: 5_210,
                },
                PageViews {
                    path: "/blog".to_string(),
                    views: 2_940,
                },
                PageViews {
                    path: "/portfolio".to_string(),
                    views: 1_876,
                },
                PageViews {
                    path: "/contact".to_string(),
                    views: 812,
                },
            ],
        }
    }
}

#[async_trait]
impl AnalyticsPort for DemoAnalytics {
    async fn record(&self, event: &AnalyticsEvent) -> Result<(), ContentError> {
        tracing::trace!(name = %event.name, "Demo analytics dropped event");
        Ok(())
    }

    async fn summary(&self) -> Result<AnalyticsSummary, ContentError> {
        Ok(Self::mock_summary())
    }

    fn is_demo(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_demo_posts_are_deterministic() -> Result<(), ContentError> {
        let a = DemoContentStore::new().list_posts().await?;
        let b = DemoContentStore::new().list_posts().await?;
        assert_eq!(a, b);
        assert_eq!(a.len(), 3);
        assert!(a[0].created_at > a[1].created_at);
        Ok(())
    }

    #[tokio::test]
    async fn test_demo_analytics_is_flagged() -> Result<(), ContentError> {
        let analytics = DemoAnalytics;
        assert!(analytics.is_demo());
        assert_eq!(analytics.summary().await?.page_views, 12_480);
        Ok(())
    }

    #[tokio::test]
    async fn test_demo_writes_stay_in_memory() -> Result<(), ContentError> {
        let store = DemoContentStore::new();
        store.delete_post(&PostId::new("demo-1")).await?;
        assert_eq!(store.list_posts().await?.len(), 2);
        assert_eq!(DemoContentStore::new().list_posts().await?.len(), 3);
        Ok(())
    }
}
