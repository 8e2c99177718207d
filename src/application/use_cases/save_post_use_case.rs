//! Save post use case implementation.

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info};

use crate::application::services::content_service::ContentService;
use crate::application::services::draft_manager::DraftManager;
use crate::application::services::editor_session::EditorSession;
use crate::domain::entities::BlogPost;
use crate::domain::errors::ContentError;
use crate::domain::ports::ContentBackend;
use crate::domain::services::ValidationErrors;

/// Why a save did not happen.
#[derive(Debug, Error)]
pub enum SavePostError {
    #[error("post is invalid: {0}")]
    Invalid(ValidationErrors),

    #[error(transparent)]
    Content(#[from] ContentError),
}

/// A post accepted by a content store.
#[derive(Debug, Clone)]
pub struct SavedPost {
    pub post: BlogPost,
    pub backend: ContentBackend,
}

/// Validates, persists and then clears the draft.
#[derive(Clone)]
pub struct SavePostUseCase {
    content: ContentService,
    drafts: DraftManager,
}

impl SavePostUseCase {
    #[must_use]
    pub const fn new(content: ContentService, drafts: DraftManager) -> Self {
        Self { content, drafts }
    }

    /// Saves the session's fields.
    ///
    /// On success the draft for the session's identity is discarded and the
    /// session is re-keyed to the saved post. A failed save leaves both the
    /// session and its draft untouched.
    ///
    /// # Errors
    /// Returns [`SavePostError::Invalid`] if validation fails, or the store's
    /// error if the post could not be written.
    pub async fn execute(&self, session: &mut EditorSession) -> Result<SavedPost, SavePostError> {
        if !session.validate() {
            debug!(errors = session.errors().len(), "Save blocked by validation");
            return Err(SavePostError::Invalid(session.errors().clone()));
        }

        let now = Utc::now();
        let fields = session.fields().clone();
        let previous = session.identity().clone();

        // The creation time comes from the post the session was opened with,
        // never from a read that may have fallen back to demo data.
        let post = match session.origin() {
            Some(origin) => {
                let mut post = origin.clone();
                post.apply(fields, now);
                post
            }
            None => BlogPost::create(fields, now),
        };

        let backend = self.content.save_post(&post).await?;
        info!(post_id = %post.id, backend = %backend, "Post saved");

        self.drafts.discard(&previous);
        session.mark_saved(&post);

        Ok(SavedPost { post, backend })
    }
}
