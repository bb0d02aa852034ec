use async_trait::async_trait;

use crate::error::BlobError;

/// One object in the content store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobEntry {
    pub key: String,
    pub size: u64,
    pub checksum: Option<String>,
}

/// Content store - key-addressed binary objects (S3/R2, in-memory).
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Create or fully replace the object at `key`.
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<(), BlobError>;

    /// Fetch the object at `key`, `None` if absent.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BlobError>;

    /// Remove the object at `key`. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<(), BlobError>;

    /// Snapshot of every object currently stored.
    async fn list(&self) -> Result<Vec<BlobEntry>, BlobError>;
}
