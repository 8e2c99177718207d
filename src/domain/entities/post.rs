//! Blog post entities and the editable field record.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier of a stored blog post.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(String);

impl PostId {
    /// Creates an id from an existing value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh random id.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Returns the inner string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PostId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Which piece of content an editor session (and its draft) belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum ContentIdentity {
    /// A post that has never been saved.
    #[default]
    New,
    /// A post already present in the collection.
    Existing(PostId),
}

impl ContentIdentity {
    const NEW_KEY: &'static str = "new";

    /// Returns the key segment used to namespace drafts.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::New => Self::NEW_KEY,
            Self::Existing(id) => id.as_str(),
        }
    }

    /// Returns true for unsaved content.
    #[must_use]
    pub const fn is_new(&self) -> bool {
        matches!(self, Self::New)
    }

    /// Returns the post id for existing content.
    #[must_use]
    pub const fn post_id(&self) -> Option<&PostId> {
        match self {
            Self::New => None,
            Self::Existing(id) => Some(id),
        }
    }
}

impl fmt::Display for ContentIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// The fixed set of fields an author edits.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PostFields {
    pub title: String,
    pub excerpt: String,
    /// Markdown body.
    pub body: String,
    /// Absolute URL of the cover image.
    pub image: String,
    pub tags: BTreeSet<String>,
    pub category: String,
    pub published: bool,
    /// Derived "N min read" label. Absent until the body has words.
    #[serde(default)]
    pub read_time: Option<String>,
}

impl PostFields {
    /// Returns true when both title and body are empty.
    ///
    /// Drafts are only worth keeping once one of them has content.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.title.is_empty() && self.body.is_empty()
    }

    /// Replaces the tag set from a comma separated list.
    pub fn set_tags_from_csv(&mut self, csv: &str) {
        self.tags = parse_tags(csv);
    }

    /// Renders tags as a comma separated list.
    #[must_use]
    pub fn tags_csv(&self) -> String {
        self.tags.iter().cloned().collect::<Vec<_>>().join(", ")
    }
}

/// Splits a comma separated tag list, trimming and dropping empty entries.
#[must_use]
pub fn parse_tags(csv: &str) -> BTreeSet<String> {
    csv.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// A stored blog post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: PostId,
    #[serde(flatten)]
    pub fields: PostFields,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BlogPost {
    /// Creates a post from freshly validated fields.
    #[must_use]
    pub fn create(fields: PostFields, now: DateTime<Utc>) -> Self {
        Self {
            id: PostId::generate(),
            fields,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces the editable fields, keeping identity and creation time.
    pub fn apply(&mut self, fields: PostFields, now: DateTime<Utc>) {
        self.fields = fields;
        self.updated_at = now;
    }

    /// Returns the content identity of this post.
    #[must_use]
    pub fn identity(&self) -> ContentIdentity {
        ContentIdentity::Existing(self.id.clone())
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.fields.title
    }

    #[must_use]
    pub const fn is_published(&self) -> bool {
        self.fields.published
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_keys() {
        assert_eq!(ContentIdentity::New.key(), "new");
        let id = PostId::new("abc");
        assert_eq!(ContentIdentity::Existing(id).key(), "abc");
    }

    #[test]
    fn test_parse_tags_dedupes_and_trims() {
        let tags = parse_tags(" Startups, ventures ,, startups ");
        assert_eq!(tags.len(), 2);
        assert!(tags.contains("startups"));
        assert!(tags.contains("ventures"));
    }

    #[test]
    fn test_blank_fields() {
        let mut fields = PostFields::default();
        assert!(fields.is_blank());
        fields.excerpt = "only an excerpt".to_string();
        assert!(fields.is_blank());
        fields.body = "x".to_string();
        assert!(!fields.is_blank());
    }

    #[test]
    fn test_apply_keeps_created_at() {
        let created = Utc::now();
        let mut post = BlogPost::create(PostFields::default(), created);
        let later = created + chrono::Duration::seconds(10);
        post.apply(
            PostFields {
                title: "Changed".to_string(),
                ..PostFields::default()
            },
            later,
        );
        assert_eq!(post.created_at, created);
        assert_eq!(post.updated_at, later);
        assert_eq!(post.title(), "Changed");
    }
}
