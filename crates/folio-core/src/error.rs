//! Domain-level error types.

use std::fmt;

use thiserror::Error;

/// A single rejected form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation failed: {}", join_fields(.0))]
    Validation(Vec<FieldError>),

    #[error("Invalid token")]
    Forbidden,

    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: &'static str, id: String },

    #[error("Stored key is not valid: {0}")]
    InvalidStoredKey(String),

    #[error(transparent)]
    Repo(#[from] RepoError),

    #[error(transparent)]
    Blob(#[from] BlobError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn post_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "post",
            id: id.into(),
        }
    }

    pub fn content_not_found(key: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "post content",
            id: key.into(),
        }
    }
}

fn join_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Metadata store errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Slug already taken: {0}")]
    DuplicateSlug(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

/// Content store errors.
#[derive(Debug, Error)]
pub enum BlobError {
    #[error("Blob backend failed: {0}")]
    Backend(String),

    #[error("Invalid blob key: {0}")]
    InvalidKey(String),
}
