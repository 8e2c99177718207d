//! Delete post use case implementation.

use tracing::info;

use crate::application::services::content_service::ContentService;
use crate::application::services::draft_manager::DraftManager;
use crate::domain::entities::{ContentIdentity, PostId};
use crate::domain::errors::ContentError;

/// Removes a post and any draft left for it.
#[derive(Clone)]
pub struct DeletePostUseCase {
    content: ContentService,
    drafts: DraftManager,
}

impl DeletePostUseCase {
    #[must_use]
    pub const fn new(content: ContentService, drafts: DraftManager) -> Self {
        Self { content, drafts }
    }

    /// # Errors
    /// Returns error if the store refuses the delete.
    pub async fn execute(&self, id: &PostId) -> Result<(), ContentError> {
        self.content.delete_post(id).await?;
        self.drafts.discard(&ContentIdentity::Existing(id.clone()));
        info!(post_id = %id, "Post deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::diagnostics::ErrorReporter;
    use crate::domain::entities::{BlogPost, PostFields};
    use crate::domain::ports::ContentStorePort;
    use crate::domain::ports::mocks::MockContentStore;
    use crate::infrastructure::content::{DemoAnalytics, DemoContentStore};
    use crate::infrastructure::storage::MemoryKeyValueStore;
    use chrono::Utc;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_delete_removes_post_and_draft() {
        let kv = Arc::new(MemoryKeyValueStore::new());
        let reporter = ErrorReporter::new(kv.clone(), "s");
        let primary = Arc::new(MockContentStore::new());
        let content = ContentService::new(
            primary.clone(),
            Arc::new(DemoContentStore::new()),
            Arc::new(DemoAnalytics),
            Arc::new(DemoAnalytics),
            reporter.clone(),
        );
        let drafts = DraftManager::new(kv, reporter);

        let fields = PostFields {
            title: "Doomed post".to_string(),
            ..PostFields::default()
        };
        let post = BlogPost::create(fields.clone(), Utc::now());
        primary.save_post(&post).await.expect("mock saves");
        drafts.autosave(&post.identity(), &fields);

        DeletePostUseCase::new(content, drafts.clone())
            .execute(&post.id)
            .await
            .expect("delete succeeds");

        assert!(primary.list_posts().await.expect("mock lists").is_empty());
        assert!(drafts.load(&post.identity()).is_none());
    }
}
