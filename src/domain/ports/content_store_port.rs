//! Port for blog post persistence.

use async_trait::async_trait;

use crate::domain::entities::{BlogPost, PostId};
use crate::domain::errors::ContentError;

/// Where a content store keeps its posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentBackend {
    /// This machine's key-value store.
    Local,
    /// The hosted database.
    Remote,
    /// Deterministic placeholder content.
    Demo,
}

impl std::fmt::Display for ContentBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Remote => write!(f, "remote"),
            Self::Demo => write!(f, "demo"),
        }
    }
}

/// Port for the `posts` collection.
#[async_trait]
pub trait ContentStorePort: Send + Sync {
    /// Which backend this store talks to.
    fn backend(&self) -> ContentBackend;

    /// Lists every post, newest first.
    async fn list_posts(&self) -> Result<Vec<BlogPost>, ContentError>;

    /// Fetches a single post.
    async fn get_post(&self, id: &PostId) -> Result<Option<BlogPost>, ContentError>;

    /// Inserts or replaces a post by id.
    async fn save_post(&self, post: &BlogPost) -> Result<(), ContentError>;

    /// Removes a post by id.
    async fn delete_post(&self, id: &PostId) -> Result<(), ContentError>;
}
