//! In-memory content store - used when no bucket is configured.

use std::collections::BTreeMap;

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;

use folio_core::error::BlobError;
use folio_core::keys;
use folio_core::ports::{BlobEntry, BlobStore};

struct StoredObject {
    bytes: Vec<u8>,
    content_type: Option<String>,
}

/// Objects in an ordered map, so `list` comes back in key order like S3.
///
/// Note: Data is lost on process restart.
pub struct InMemoryBlobStore {
    objects: RwLock<BTreeMap<String, StoredObject>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self {
            objects: RwLock::new(BTreeMap::new()),
        }
    }

    /// Content type recorded by the last `put` of `key`.
    pub async fn content_type(&self, key: &str) -> Option<String> {
        self.objects
            .read()
            .await
            .get(key)
            .and_then(|object| object.content_type.clone())
    }

    fn check_key(key: &str) -> Result<(), BlobError> {
        if keys::is_valid_key(key) {
            Ok(())
        } else {
            Err(BlobError::InvalidKey(key.to_string()))
        }
    }
}

impl Default for InMemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<(), BlobError> {
        Self::check_key(key)?;

        self.objects.write().await.insert(
            key.to_string(),
            StoredObject {
                bytes,
                content_type: content_type.map(str::to_string),
            },
        );
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BlobError> {
        Self::check_key(key)?;
        Ok(self
            .objects
            .read()
            .await
            .get(key)
            .map(|object| object.bytes.clone()))
    }

    async fn delete(&self, key: &str) -> Result<(), BlobError> {
        Self::check_key(key)?;
        self.objects.write().await.remove(key);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<BlobEntry>, BlobError> {
        let objects = self.objects.read().await;
        Ok(objects
            .iter()
            .map(|(key, object)| BlobEntry {
                key: key.clone(),
                size: object.bytes.len() as u64,
                checksum: Some(format!("{:x}", Sha256::digest(&object.bytes))),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_replace() {
        let store = InMemoryBlobStore::new();
        store.put("a.md", b"one".to_vec(), Some("text/markdown")).await.unwrap();
        store.put("a.md", b"two".to_vec(), None).await.unwrap();

        assert_eq!(store.get("a.md").await.unwrap(), Some(b"two".to_vec()));
        assert_eq!(store.content_type("a.md").await, None);
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let store = InMemoryBlobStore::new();
        assert_eq!(store.get("nothing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = InMemoryBlobStore::new();
        store.put("k", vec![1], None).await.unwrap();
        store.delete("k").await.unwrap();
        store.delete("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_list_reports_size_and_sha256() {
        let store = InMemoryBlobStore::new();
        store.put("b", b"abc".to_vec(), None).await.unwrap();
        store.put("a", Vec::new(), None).await.unwrap();

        let entries = store.list().await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].key, "a");
        assert_eq!(entries[0].size, 0);
        assert_eq!(entries[1].size, 3);
        assert_eq!(
            entries[1].checksum.as_deref(),
            Some("ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad")
        );
    }

    #[tokio::test]
    async fn test_rejects_unsafe_keys() {
        let store = InMemoryBlobStore::new();
        let err = store.put("../escape", vec![], None).await.unwrap_err();
        assert!(matches!(err, BlobError::InvalidKey(_)));
    }
}
