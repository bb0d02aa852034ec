//! Data Transfer Objects - request/response bodies for the publishing API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Post metadata as listed and returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub tags: Option<String>,
    pub content_key: String,
    pub header_key: Option<String>,
    pub slug: String,
    pub created_at: DateTime<Utc>,
}

/// A single post with its body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostDetail {
    #[serde(flatten)]
    pub summary: PostSummary,
    pub markdown: String,
}

/// GET /list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostListResponse {
    pub posts: Vec<PostSummary>,
}

/// GET /post/{id_or_slug}
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub post: PostDetail,
}

/// POST /upload, /create-blog
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostResponse {
    pub message: String,
    pub post_id: String,
    pub content_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_key: Option<String>,
    pub slug: String,
}

/// POST /upload-img
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageUploadResponse {
    pub message: String,
    pub key: String,
}

/// Plain acknowledgement, e.g. after a delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub orphaned_keys: Vec<String>,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            orphaned_keys: Vec::new(),
        }
    }
}
