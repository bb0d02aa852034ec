//! S3-compatible content store (AWS S3, Cloudflare R2, MinIO).

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_sdk_s3::Client;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;

use folio_core::error::BlobError;
use folio_core::ports::{BlobEntry, BlobStore};

use super::S3Config;

/// Content store backed by an S3 bucket.
#[derive(Clone)]
pub struct S3BlobStore {
    client: Client,
    bucket: String,
}

impl S3BlobStore {
    pub async fn new(config: S3Config) -> Self {
        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(config.region));

        if let (Some(access_key_id), Some(secret_access_key)) =
            (config.access_key_id, config.secret_access_key)
        {
            loader = loader.credentials_provider(Credentials::new(
                access_key_id,
                secret_access_key,
                None,
                None,
                "folio",
            ));
        }
        if let Some(endpoint_url) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint_url);
        }

        let shared = loader.load().await;
        let client = Client::from_conf(
            aws_sdk_s3::config::Builder::from(&shared)
                .force_path_style(true)
                .build(),
        );

        tracing::info!(
            bucket = %config.bucket,
            endpoint = config.endpoint_url.as_deref().unwrap_or("aws"),
            "Content store client ready"
        );

        Self {
            client,
            bucket: config.bucket,
        }
    }

    fn backend_error<E: std::error::Error>(err: E) -> BlobError {
        BlobError::Backend(DisplayErrorContext(err).to_string())
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<(), BlobError> {
        let size = bytes.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(bytes))
            .set_content_type(content_type.map(str::to_string))
            .send()
            .await
            .map_err(Self::backend_error)?;

        tracing::debug!(key = %key, size, "Object stored");
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BlobError> {
        let output = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(output) => output,
            Err(err) if err.as_service_error().is_some_and(|e| e.is_no_such_key()) => {
                return Ok(None);
            }
            Err(err) => return Err(Self::backend_error(err)),
        };

        let data = output
            .body
            .collect()
            .await
            .map_err(Self::backend_error)?;
        Ok(Some(data.into_bytes().to_vec()))
    }

    async fn delete(&self, key: &str) -> Result<(), BlobError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(Self::backend_error)?;

        tracing::debug!(key = %key, "Object deleted");
        Ok(())
    }

    async fn list(&self) -> Result<Vec<BlobEntry>, BlobError> {
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .into_paginator()
            .send();

        let mut entries = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page.map_err(Self::backend_error)?;
            for object in page.contents() {
                let Some(key) = object.key() else {
                    continue;
                };
                entries.push(BlobEntry {
                    key: key.to_string(),
                    size: object.size().unwrap_or_default().max(0) as u64,
                    checksum: object.e_tag().map(|tag| tag.trim_matches('"').to_string()),
                });
            }
        }

        Ok(entries)
    }
}
