//! Publish orchestration - create, list, get and delete posts across the
//! metadata store and the content store.
//!
//! The two stores share no transaction. Blobs are written before the row
//! that references them, and rows are removed before their blobs, so a
//! failure part-way leaves an orphan blob rather than a row pointing at
//! nothing.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::{CreatedPost, DeleteOutcome, Post, PostWithBody};
use crate::error::{DomainError, RepoError};
use crate::keys;
use crate::ports::{BlobStore, PostRepository};
use crate::slug;
use crate::validation::{
    PostDraft, RawImageForm, RawPostForm, Validated, validate_image_form, validate_post_form,
};

/// Base slug used when a title has nothing slug-worthy in it.
pub const FALLBACK_SLUG: &str = "post";

/// How many times create re-resolves a slug after losing a race.
pub const DEFAULT_SLUG_ATTEMPTS: usize = 5;

/// Configuration threaded into [`PublishService`].
#[derive(Debug, Clone)]
pub struct PublishSettings {
    /// Pre-shared upload token.
    pub shared_secret: String,
    pub slug_attempts: usize,
}

impl PublishSettings {
    pub fn new(shared_secret: impl Into<String>) -> Self {
        Self {
            shared_secret: shared_secret.into(),
            slug_attempts: DEFAULT_SLUG_ATTEMPTS,
        }
    }
}

/// The publish/retrieve/delete use cases.
#[derive(Clone)]
pub struct PublishService {
    posts: Arc<dyn PostRepository>,
    blobs: Arc<dyn BlobStore>,
    settings: Arc<PublishSettings>,
}

impl PublishService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        blobs: Arc<dyn BlobStore>,
        settings: PublishSettings,
    ) -> Self {
        Self {
            posts,
            blobs,
            settings: Arc::new(settings),
        }
    }

    fn authorize(&self, token: &str) -> Result<(), DomainError> {
        if token == self.settings.shared_secret {
            Ok(())
        } else {
            tracing::warn!("Rejected upload with invalid token");
            Err(DomainError::Forbidden)
        }
    }

    /// Validate, authorize, store the body (and header image), then record the
    /// post under a unique slug.
    #[tracing::instrument(skip_all)]
    pub async fn create(&self, form: RawPostForm) -> Result<CreatedPost, DomainError> {
        let Validated { value, token } = validate_post_form(form).map_err(DomainError::Validation)?;
        self.authorize(&token)?;

        let PostDraft {
            content,
            header,
            title,
            description,
            category,
            tags,
        } = value;

        let created_at = Utc::now();
        let content_key = keys::content_key(content.file_name(), created_at);
        let content_type = content.content_type().to_string();
        self.blobs
            .put(&content_key, content.into_bytes(), Some(&content_type))
            .await?;
        tracing::debug!(key = %content_key, "Stored post content");

        let header_key = match header {
            Some(image) => {
                let key = keys::image_key(&image.meta.original_name);
                self.blobs
                    .put(&key, image.bytes, Some(image.format.media_type()))
                    .await?;
                tracing::debug!(key = %key, "Stored header image");
                Some(key)
            }
            None => None,
        };

        let base = base_slug(&title);
        let mut post = Post {
            id: keys::post_id(),
            title,
            description,
            category,
            tags,
            content_key,
            header_key,
            slug: base.clone(),
            created_at,
        };

        for attempt in 1..=self.settings.slug_attempts {
            let existing = self.posts.slugs_with_prefix(&base).await?;
            post.slug = slug::resolve(&base, &existing);

            match self.posts.insert(post.clone()).await {
                Ok(saved) => {
                    tracing::info!(post_id = %saved.id, slug = %saved.slug, "Post created");
                    return Ok(CreatedPost {
                        id: saved.id,
                        slug: saved.slug,
                        content_key: saved.content_key,
                        header_key: saved.header_key,
                    });
                }
                Err(RepoError::DuplicateSlug(taken)) => {
                    tracing::warn!(attempt, slug = %taken, "Slug taken by a concurrent create, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(DomainError::Internal(format!(
            "no free slug for '{base}' after {} attempts",
            self.settings.slug_attempts
        )))
    }

    /// Store a standalone image and return its key. No post row is written.
    #[tracing::instrument(skip_all)]
    pub async fn create_image(&self, form: RawImageForm) -> Result<String, DomainError> {
        let Validated { value, token } =
            validate_image_form(form).map_err(DomainError::Validation)?;
        self.authorize(&token)?;

        let key = keys::image_key(&value.meta.original_name);
        self.blobs
            .put(&key, value.bytes, Some(value.format.media_type()))
            .await?;

        tracing::info!(key = %key, size = value.meta.size, "Image stored");
        Ok(key)
    }

    /// Post metadata, newest first. Bodies are not loaded.
    pub async fn list(&self) -> Result<Vec<Post>, DomainError> {
        Ok(self.posts.list_recent().await?)
    }

    /// Look a post up by id, then by slug, and join it with its body.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, id_or_slug: &str) -> Result<PostWithBody, DomainError> {
        let post = match self.posts.find_by_id(id_or_slug).await? {
            Some(post) => post,
            None => self
                .posts
                .find_by_slug(id_or_slug)
                .await?
                .ok_or_else(|| DomainError::post_not_found(id_or_slug))?,
        };

        let bytes = self
            .blobs
            .get(&post.content_key)
            .await?
            .ok_or_else(|| {
                tracing::warn!(post_id = %post.id, key = %post.content_key, "Post content missing");
                DomainError::content_not_found(&post.content_key)
            })?;

        Ok(PostWithBody {
            markdown: String::from_utf8_lossy(&bytes).into_owned(),
            post,
        })
    }

    /// Remove the row, then its blobs. Blobs that fail to delete are reported
    /// in the outcome and left as orphans.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<DeleteOutcome, DomainError> {
        let post = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::post_not_found(id))?;

        if let Some(bad) = post.blob_keys().find(|key| !keys::is_valid_key(key)) {
            return Err(DomainError::InvalidStoredKey(bad.to_string()));
        }

        match self.posts.delete(id).await {
            Ok(()) => {}
            Err(RepoError::NotFound) => return Err(DomainError::post_not_found(id)),
            Err(e) => return Err(e.into()),
        }

        let mut outcome = DeleteOutcome::default();
        for key in post.blob_keys() {
            if let Err(e) = self.blobs.delete(key).await {
                tracing::warn!(key = %key, error = %e, "Blob left behind after post delete");
                outcome.orphaned_keys.push(key.to_string());
            }
        }

        tracing::info!(post_id = %id, orphans = outcome.orphaned_keys.len(), "Post deleted");
        Ok(outcome)
    }
}

fn base_slug(title: &str) -> String {
    let slug = slug::normalize(title);
    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}
