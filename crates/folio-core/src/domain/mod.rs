//! Domain entities - the core business objects.

mod content;
mod post;

pub use content::{FileMeta, ImageFormat, ImageUpload, UploadedContent, INLINE_MARKDOWN_NAME};
pub use post::{CreatedPost, DeleteOutcome, Post, PostWithBody};
