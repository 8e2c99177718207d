//! In-memory state of one editing session.

use crate::domain::entities::{BlogPost, ContentIdentity, Draft, PostFields};
use crate::domain::services::{ValidationErrors, auto_excerpt, estimate_read_time, validate_post};

/// Field currently addressed by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorField {
    Title,
    Excerpt,
    Image,
    Tags,
    Category,
    Published,
    Body,
}

impl EditorField {
    /// Focus order used by the editor screen.
    pub const ORDER: [Self; 7] = [
        Self::Title,
        Self::Excerpt,
        Self::Image,
        Self::Tags,
        Self::Category,
        Self::Published,
        Self::Body,
    ];

    #[must_use]
    pub fn next(self) -> Self {
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(idx + 1) % Self::ORDER.len()]
    }

    #[must_use]
    pub fn previous(self) -> Self {
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(idx + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Excerpt => "Excerpt",
            Self::Image => "Cover image URL",
            Self::Tags => "Tags (comma separated)",
            Self::Category => "Category",
            Self::Published => "Published",
            Self::Body => "Content (Markdown)",
        }
    }
}

/// Editable fields plus the derivations that follow body edits.
#[derive(Debug, Clone)]
pub struct EditorSession {
    identity: ContentIdentity,
    origin: Option<BlogPost>,
    fields: PostFields,
    errors: ValidationErrors,
    dirty: bool,
}

impl EditorSession {
    /// Starts a blank session for a new post.
    #[must_use]
    pub fn new_post(default_category: impl Into<String>) -> Self {
        Self {
            identity: ContentIdentity::New,
            origin: None,
            fields: PostFields {
                category: default_category.into(),
                ..PostFields::default()
            },
            errors: ValidationErrors::default(),
            dirty: false,
        }
    }

    /// Starts a session editing a stored post.
    #[must_use]
    pub fn edit(post: &BlogPost) -> Self {
        Self {
            identity: post.identity(),
            origin: Some(post.clone()),
            fields: post.fields.clone(),
            errors: ValidationErrors::default(),
            dirty: false,
        }
    }

    #[must_use]
    pub const fn identity(&self) -> &ContentIdentity {
        &self.identity
    }

    /// The stored post this session edits, as last loaded or saved.
    #[must_use]
    pub const fn origin(&self) -> Option<&BlogPost> {
        self.origin.as_ref()
    }

    #[must_use]
    pub const fn fields(&self) -> &PostFields {
        &self.fields
    }

    #[must_use]
    pub const fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Returns true if anything changed since the session opened.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Replaces every field with a recovered draft.
    pub fn restore(&mut self, draft: Draft) {
        self.fields = draft.fields;
        self.errors = ValidationErrors::default();
        self.dirty = true;
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.fields.title = title.into();
        self.dirty = true;
    }

    pub fn set_excerpt(&mut self, excerpt: impl Into<String>) {
        self.fields.excerpt = excerpt.into();
        self.dirty = true;
    }

    pub fn set_image(&mut self, image: impl Into<String>) {
        self.fields.image = image.into();
        self.dirty = true;
    }

    pub fn set_tags_csv(&mut self, csv: &str) {
        self.fields.set_tags_from_csv(csv);
        self.dirty = true;
    }

    pub fn set_category(&mut self, category: impl Into<String>) {
        self.fields.category = category.into();
        self.dirty = true;
    }

    pub fn set_published(&mut self, published: bool) {
        self.fields.published = published;
        self.dirty = true;
    }

    /// Updates the body and re-runs the derived fields.
    ///
    /// The read time always follows the body. The excerpt is only filled in
    /// while it is empty.
    pub fn set_body(&mut self, body: impl Into<String>) {
        self.fields.body = body.into();
        self.dirty = true;

        if let Some(read_time) = estimate_read_time(&self.fields.body) {
            self.fields.read_time = Some(read_time);
        }

        if self.fields.excerpt.is_empty()
            && let Some(excerpt) = auto_excerpt(&self.fields.body)
        {
            self.fields.excerpt = excerpt;
        }
    }

    /// Validates the current fields and remembers the messages.
    ///
    /// Returns true when the fields may be saved.
    pub fn validate(&mut self) -> bool {
        match validate_post(&self.fields) {
            Ok(()) => {
                self.errors = ValidationErrors::default();
                true
            }
            Err(errors) => {
                self.errors = errors;
                false
            }
        }
    }

    /// Marks the session as persisted as `post`.
    pub fn mark_saved(&mut self, post: &BlogPost) {
        self.identity = post.identity();
        self.origin = Some(post.clone());
        self.dirty = false;
    }
}
