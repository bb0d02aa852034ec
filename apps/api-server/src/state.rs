//! Application state - shared across all handlers.

use std::sync::Arc;

use folio_core::ports::{BlobStore, PostRepository};
use folio_core::{PublishService, PublishSettings};
use folio_infra::{DatabaseConfig, InMemoryBlobStore, InMemoryPostRepository, S3Config};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub publisher: PublishService,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let posts = post_repository(config.database.as_ref()).await;
        let blobs = blob_store(config.blob_store.as_ref()).await;

        tracing::info!("Application state initialized");

        Self::with_stores(posts, blobs, &config.shared_secret)
    }

    pub fn with_stores(
        posts: Arc<dyn PostRepository>,
        blobs: Arc<dyn BlobStore>,
        shared_secret: &str,
    ) -> Self {
        Self {
            publisher: PublishService::new(posts, blobs, PublishSettings::new(shared_secret)),
        }
    }
}

async fn post_repository(config: Option<&DatabaseConfig>) -> Arc<dyn PostRepository> {
    #[cfg(feature = "postgres")]
    {
        if let Some(config) = config {
            match folio_infra::database::connect(config).await {
                Ok(conn) => return Arc::new(folio_infra::PostgresPostRepository::new(conn)),
                Err(e) => tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                ),
            }
        } else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        }
    }

    #[cfg(not(feature = "postgres"))]
    {
        if config.is_some() {
            tracing::warn!("DATABASE_URL ignored: built without the postgres feature");
        }
        tracing::info!("Running without postgres feature - using in-memory repository");
    }

    Arc::new(InMemoryPostRepository::new())
}

async fn blob_store(config: Option<&S3Config>) -> Arc<dyn BlobStore> {
    #[cfg(feature = "s3")]
    {
        if let Some(config) = config {
            tracing::info!(bucket = %config.bucket, "Using S3-compatible content store");
            return Arc::new(folio_infra::S3BlobStore::new(config.clone()).await);
        }
        tracing::warn!("BLOB_BUCKET not set. Post bodies are kept in memory.");
    }

    #[cfg(not(feature = "s3"))]
    {
        if config.is_some() {
            tracing::warn!("BLOB_BUCKET ignored: built without the s3 feature");
        }
        tracing::info!("Running without s3 feature - using in-memory content store");
    }

    Arc::new(InMemoryBlobStore::new())
}
