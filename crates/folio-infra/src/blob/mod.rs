//! Content store implementations - S3-compatible object storage and in-memory.

mod config;
mod memory;

#[cfg(feature = "s3")]
mod s3;

pub use config::S3Config;
pub use memory::InMemoryBlobStore;

#[cfg(feature = "s3")]
pub use s3::S3BlobStore;
