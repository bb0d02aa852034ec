use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Post entity - metadata for a published document.
///
/// The body itself lives in the blob store under `content_key`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub tags: Option<String>,
    pub content_key: String,
    pub header_key: Option<String>,
    pub slug: String,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Every blob key this post references, content first.
    pub fn blob_keys(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.content_key.as_str()).chain(self.header_key.as_deref())
    }
}

/// A post joined with its decoded body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostWithBody {
    pub post: Post,
    pub markdown: String,
}

/// Identifiers handed back after a successful create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedPost {
    pub id: String,
    pub slug: String,
    pub content_key: String,
    pub header_key: Option<String>,
}

/// Result of a delete: the row is always gone, blobs may have been left behind.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeleteOutcome {
    pub orphaned_keys: Vec<String>,
}

impl DeleteOutcome {
    pub fn is_complete(&self) -> bool {
        self.orphaned_keys.is_empty()
    }
}
