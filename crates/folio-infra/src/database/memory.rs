//! In-memory metadata store - used when no database is configured.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use folio_core::domain::Post;
use folio_core::error::RepoError;
use folio_core::ports::PostRepository;

/// Post rows keyed by id, with the same uniqueness rules as the
/// `posts` table: unique id, unique slug.
///
/// Note: Data is lost on process restart.
pub struct InMemoryPostRepository {
    rows: RwLock<HashMap<String, Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryPostRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        // Check and insert under one write lock so the slug constraint holds.
        let mut rows = self.rows.write().await;

        if rows.contains_key(&post.id) {
            return Err(RepoError::Constraint(format!(
                "post id {} already exists",
                post.id
            )));
        }
        if rows.values().any(|existing| existing.slug == post.slug) {
            return Err(RepoError::DuplicateSlug(post.slug));
        }

        rows.insert(post.id.clone(), post.clone());
        Ok(post)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Post>, RepoError> {
        Ok(self.rows.read().await.get(id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let rows = self.rows.read().await;
        Ok(rows.values().find(|post| post.slug == slug).cloned())
    }

    async fn list_recent(&self) -> Result<Vec<Post>, RepoError> {
        let mut posts: Vec<Post> = self.rows.read().await.values().cloned().collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(posts)
    }

    async fn slugs_with_prefix(&self, prefix: &str) -> Result<Vec<String>, RepoError> {
        let rows = self.rows.read().await;
        Ok(rows
            .values()
            .filter(|post| post.slug.starts_with(prefix))
            .map(|post| post.slug.clone())
            .collect())
    }

    async fn delete(&self, id: &str) -> Result<(), RepoError> {
        match self.rows.write().await.remove(id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}
