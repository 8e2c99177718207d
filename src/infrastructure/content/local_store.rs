//! Post collection kept in the local key-value store.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::entities::{BlogPost, PostId};
use crate::domain::errors::ContentError;
use crate::domain::ports::{
    ContentBackend, ContentStorePort, JsonStoreExt, KeyValueStorePort, POSTS_KEY,
};

/// Content store backed by the `blog-posts` key.
pub struct LocalContentStore {
    store: Arc<dyn KeyValueStorePort>,
}

impl LocalContentStore {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStorePort>) -> Self {
        Self { store }
    }

    fn read_all(&self) -> Vec<BlogPost> {
        self.store.get_json(POSTS_KEY).unwrap_or_default()
    }

    fn write_all(&self, posts: &[BlogPost]) -> Result<(), ContentError> {
        self.store.set_json(POSTS_KEY, posts)?;
        Ok(())
    }
}

#[async_trait]
impl ContentStorePort for LocalContentStore {
    fn backend(&self) -> ContentBackend {
        ContentBackend::Local
    }

    async fn list_posts(&self) -> Result<Vec<BlogPost>, ContentError> {
        let mut posts = self.read_all();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn get_post(&self, id: &PostId) -> Result<Option<BlogPost>, ContentError> {
        Ok(self.read_all().into_iter().find(|p| &p.id == id))
    }

    async fn save_post(&self, post: &BlogPost) -> Result<(), ContentError> {
        let mut posts = self.read_all();
        match posts.iter_mut().find(|p| p.id == post.id) {
            Some(existing) => *existing = post.clone(),
            None => posts.push(post.clone()),
        }
        self.write_all(&posts)?;
        debug!(id = %post.id, count = posts.len(), "Saved post locally");
        Ok(())
    }

    async fn delete_post(&self, id: &PostId) -> Result<(), ContentError> {
        let mut posts = self.read_all();
        let before = posts.len();
        posts.retain(|p| &p.id != id);
        if posts.len() == before {
            return Err(ContentError::not_found(id.as_str()));
        }
        self.write_all(&posts)?;
        debug!(id = %id, "Deleted local post");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::PostFields;
    use crate::infrastructure::storage::{
        DEFAULT_QUOTA_BYTES, FileKeyValueStore, MemoryKeyValueStore,
    };
    use chrono::{TimeZone, Utc};

    fn sample_post(title: &str, day: u32) -> BlogPost {
        let created = Utc
            .with_ymd_and_hms(2024, 3, day, 9, 30, 0)
            .single()
            .expect("valid timestamp");
        let mut fields = PostFields {
            title: title.to_string(),
            excerpt: "An excerpt long enough to describe the article to busy founders.".to_string(),
            body: "# Heading\n\nBody with **markup** and unicode: café.".to_string(),
            image: "https://images.example.com/cover.jpg".to_string(),
            category: "insights".to_string(),
            published: true,
            read_time: Some("1 min read".to_string()),
            ..PostFields::default()
        };
        fields.set_tags_from_csv("studio, design");
        BlogPost::create(fields, created)
    }

    #[tokio::test]
    async fn test_saved_post_round_trips_through_file_store()
    -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let post = sample_post("Round trip fidelity", 1);
        {
            let kv = Arc::new(FileKeyValueStore::open(dir.path(), DEFAULT_QUOTA_BYTES)?);
            LocalContentStore::new(kv).save_post(&post).await?;
        }

        let kv = Arc::new(FileKeyValueStore::open(dir.path(), DEFAULT_QUOTA_BYTES)?);
        let posts = LocalContentStore::new(kv).list_posts().await?;
        assert_eq!(posts, vec![post]);
        Ok(())
    }

    #[tokio::test]
    async fn test_save_replaces_by_id_and_lists_newest_first() -> Result<(), ContentError> {
        let store = LocalContentStore::new(Arc::new(MemoryKeyValueStore::new()));
        let older = sample_post("Older post title", 1);
        let mut newer = sample_post("Newer post title", 2);
        store.save_post(&older).await?;
        store.save_post(&newer).await?;

        newer.fields.title = "Renamed newer post".to_string();
        store.save_post(&newer).await?;

        let posts = store.list_posts().await?;
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].title(), "Renamed newer post");
        assert_eq!(posts[1].id, older.id);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_missing_post() -> Result<(), ContentError> {
        let store = LocalContentStore::new(Arc::new(MemoryKeyValueStore::new()));
        let post = sample_post("Delete me please", 3);
        store.save_post(&post).await?;
        store.delete_post(&post.id).await?;
        assert!(store.get_post(&post.id).await?.is_none());
        assert!(matches!(
            store.delete_post(&post.id).await,
            Err(ContentError::NotFound { .. })
        ));
        Ok(())
    }
}
