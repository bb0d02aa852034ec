//! # Folio Core
//!
//! The domain layer of the Folio publishing backend.
//! Validation, key and slug generation, and the publish/retrieve/delete
//! orchestration live here. Stores are reached only through the traits in
//! [`ports`].

pub mod domain;
pub mod error;
pub mod keys;
pub mod ports;
pub mod service;
pub mod slug;
pub mod validation;

pub use error::DomainError;
pub use service::{PublishService, PublishSettings};
