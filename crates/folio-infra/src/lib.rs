//! # Folio Infrastructure
//!
//! Concrete implementations of the ports defined in `folio-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `postgres` - PostgreSQL metadata store via SeaORM
//! - `s3` - S3-compatible content store (AWS S3, Cloudflare R2, MinIO)

pub mod blob;
pub mod database;

// Re-exports - In-Memory
pub use blob::{InMemoryBlobStore, S3Config};
pub use database::{DatabaseConfig, InMemoryPostRepository};

#[cfg(feature = "postgres")]
pub use database::PostgresPostRepository;

#[cfg(feature = "s3")]
pub use blob::S3BlobStore;
