//! Locally persisted, unpublished editor snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::post::{ContentIdentity, PostFields};

/// Storage key prefix for drafts.
pub const DRAFT_KEY_PREFIX: &str = "blog-draft-";

/// Snapshot of in-progress fields plus the time it was taken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    #[serde(flatten)]
    pub fields: PostFields,
    pub saved_at: DateTime<Utc>,
}

impl Draft {
    #[must_use]
    pub fn new(fields: PostFields, saved_at: DateTime<Utc>) -> Self {
        Self { fields, saved_at }
    }

    /// Returns true if the draft holds a title or body worth restoring.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        !self.fields.is_blank()
    }

    /// Storage key for the draft of the given content.
    #[must_use]
    pub fn storage_key(identity: &ContentIdentity) -> String {
        format!("{DRAFT_KEY_PREFIX}{}", identity.key())
    }
}
