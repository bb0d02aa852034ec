//! Uploaded content, tagged by what it is rather than sniffed at use sites.

/// Metadata about a file part received from a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMeta {
    /// Media type as declared by the client (or inferred from the extension).
    pub media_type: String,
    pub size: u64,
    pub original_name: String,
}

/// Accepted image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Webp,
    Jpeg,
    Gif,
}

impl ImageFormat {
    pub fn from_media_type(media_type: &str) -> Option<Self> {
        match media_type {
            "image/png" => Some(Self::Png),
            "image/webp" => Some(Self::Webp),
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/gif" => Some(Self::Gif),
            _ => None,
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "png" => Some(Self::Png),
            "webp" => Some(Self::Webp),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "gif" => Some(Self::Gif),
            _ => None,
        }
    }

    pub fn media_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Webp => "image/webp",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
        }
    }
}

/// A validated image upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub format: ImageFormat,
    pub meta: FileMeta,
    pub bytes: Vec<u8>,
}

/// The body of a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadedContent {
    /// Markdown sent inline as a text field.
    MarkdownText { text: String },
    /// A non-image file part (markdown or plain text).
    GenericFile { meta: FileMeta, bytes: Vec<u8> },
    /// An image sent as the post body.
    Image(ImageUpload),
}

/// Filename used for content keys when the body arrived inline.
pub const INLINE_MARKDOWN_NAME: &str = "post.md";

impl UploadedContent {
    /// The filename that goes into the storage key.
    pub fn file_name(&self) -> &str {
        match self {
            Self::MarkdownText { .. } => INLINE_MARKDOWN_NAME,
            Self::GenericFile { meta, .. } => &meta.original_name,
            Self::Image(image) => &image.meta.original_name,
        }
    }

    /// Content type recorded alongside the blob.
    pub fn content_type(&self) -> &str {
        match self {
            Self::MarkdownText { .. } => "text/markdown",
            Self::GenericFile { meta, .. } => &meta.media_type,
            Self::Image(image) => image.format.media_type(),
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::MarkdownText { text } => text.into_bytes(),
            Self::GenericFile { bytes, .. } => bytes,
            Self::Image(image) => image.bytes,
        }
    }
}
