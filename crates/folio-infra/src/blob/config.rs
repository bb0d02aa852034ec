use std::fmt;

/// Bucket connection settings for an S3-compatible content store.
#[derive(Clone)]
pub struct S3Config {
    pub bucket: String,
    /// Custom endpoint, e.g. `https://<account>.r2.cloudflarestorage.com`.
    pub endpoint_url: Option<String>,
    /// R2 accepts `auto`.
    pub region: String,
    /// Static credentials. When absent the default AWS provider chain is used.
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
}

impl fmt::Debug for S3Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("S3Config")
            .field("bucket", &self.bucket)
            .field("endpoint_url", &self.endpoint_url)
            .field("region", &self.region)
            .field("access_key_id", &self.access_key_id)
            .field(
                "secret_access_key",
                &self.secret_access_key.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}
