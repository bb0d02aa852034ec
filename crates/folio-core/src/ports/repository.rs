use async_trait::async_trait;

use crate::domain::Post;
use crate::error::RepoError;

/// Metadata store for posts.
///
/// Implementations must reject an insert whose `slug` is already present with
/// [`RepoError::DuplicateSlug`], and one whose `id` is present with
/// [`RepoError::Constraint`].
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Insert a new row. Never overwrites.
    async fn insert(&self, post: Post) -> Result<Post, RepoError>;

    /// Find a post by its opaque id.
    async fn find_by_id(&self, id: &str) -> Result<Option<Post>, RepoError>;

    /// Find a post by its slug.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError>;

    /// All posts, newest first.
    async fn list_recent(&self) -> Result<Vec<Post>, RepoError>;

    /// Every slug currently stored that starts with `prefix`.
    async fn slugs_with_prefix(&self, prefix: &str) -> Result<Vec<String>, RepoError>;

    /// Delete a post by id. Returns [`RepoError::NotFound`] if no row matched.
    async fn delete(&self, id: &str) -> Result<(), RepoError>;
}
