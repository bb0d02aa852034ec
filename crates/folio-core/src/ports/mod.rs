//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod blob_store;
mod repository;

pub use blob_store::{BlobEntry, BlobStore};
pub use repository::PostRepository;
