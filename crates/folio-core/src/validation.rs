//! Multipart form validation.
//!
//! Rules are plain data ([`TextRule`], [`FileRule`]) so they can be checked
//! in isolation. The form validators run every rule and return either a
//! strongly-typed value or the full list of [`FieldError`]s.
//!
//! The upload token is only checked for presence here. Comparing it against
//! the shared secret is an authorization step done by the caller afterwards.

use crate::domain::{FileMeta, ImageFormat, ImageUpload, UploadedContent};
use crate::error::FieldError;

/// Upper bound for any uploaded body, inline markdown included.
pub const MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;

const OCTET_STREAM: &str = "application/octet-stream";

/// A file part as received, before any checks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFile {
    pub name: String,
    pub media_type: Option<String>,
    /// Bytes seen on the wire. May exceed `bytes.len()` when the reader
    /// stopped buffering an oversized part.
    pub size: u64,
    pub bytes: Vec<u8>,
}

impl RawFile {
    pub fn new(name: impl Into<String>, media_type: Option<&str>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.map(str::to_string),
            size: bytes.len() as u64,
            bytes,
        }
    }

    fn extension(&self) -> Option<String> {
        self.name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
    }

    /// Declared media type, or one inferred from the extension when the client
    /// sent none or a generic octet stream.
    pub fn effective_media_type(&self) -> Option<String> {
        let declared = self
            .media_type
            .as_deref()
            .map(|mt| mt.split(';').next().unwrap_or(mt).trim().to_ascii_lowercase())
            .filter(|mt| !mt.is_empty() && mt != OCTET_STREAM);

        declared.or_else(|| {
            let ext = self.extension()?;
            match ext.as_str() {
                "md" | "markdown" => Some("text/markdown".to_string()),
                "txt" => Some("text/plain".to_string()),
                other => ImageFormat::from_extension(other).map(|f| f.media_type().to_string()),
            }
        })
    }
}

/// Raw fields of a create-post form.
#[derive(Debug, Clone, Default)]
pub struct RawPostForm {
    pub file: Option<RawFile>,
    pub markdown: Option<String>,
    pub header: Option<RawFile>,
    pub token: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub tags: Option<String>,
}

/// Raw fields of a standalone image upload.
#[derive(Debug, Clone, Default)]
pub struct RawImageForm {
    pub file: Option<RawFile>,
    pub token: Option<String>,
}

/// A validated value plus the token that still has to be authorized.
#[derive(Debug, Clone)]
pub struct Validated<T> {
    pub value: T,
    pub token: String,
}

/// A fully validated create-post request.
#[derive(Debug, Clone)]
pub struct PostDraft {
    pub content: UploadedContent,
    pub header: Option<ImageUpload>,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub tags: Option<String>,
}

/// Length and presence rule for a text field.
#[derive(Debug, Clone, Copy)]
pub struct TextRule {
    pub field: &'static str,
    pub label: &'static str,
    pub required: bool,
    pub max_chars: usize,
}

pub const TITLE: TextRule = TextRule {
    field: "title",
    label: "Title",
    required: true,
    max_chars: 200,
};

pub const DESCRIPTION: TextRule = TextRule {
    field: "description",
    label: "Description",
    required: false,
    max_chars: 1000,
};

pub const CATEGORY: TextRule = TextRule {
    field: "category",
    label: "Category",
    required: true,
    max_chars: 50,
};

pub const TAGS: TextRule = TextRule {
    field: "tags",
    label: "Tags",
    required: false,
    max_chars: 200,
};

pub const TOKEN: TextRule = TextRule {
    field: "token",
    label: "Token",
    required: true,
    max_chars: 512,
};

impl TextRule {
    /// Blank optional values come back as `None`.
    pub fn check(&self, value: Option<&str>) -> Result<Option<String>, FieldError> {
        let value = value.filter(|v| !v.trim().is_empty());

        match value {
            None if self.required => Err(FieldError::new(
                self.field,
                format!("{} is required", self.label),
            )),
            None => Ok(None),
            Some(v) if v.chars().count() > self.max_chars => Err(FieldError::new(
                self.field,
                format!(
                    "{} must be less than {} characters",
                    self.label, self.max_chars
                ),
            )),
            Some(v) => Ok(Some(v.to_string())),
        }
    }

    fn require(&self, value: Option<&str>) -> Result<String, FieldError> {
        self.check(value)?.ok_or_else(|| {
            FieldError::new(self.field, format!("{} is required", self.label))
        })
    }
}

/// What an accepted file turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Text,
    Image(ImageFormat),
}

/// Presence, size and type rule for a file field.
#[derive(Debug, Clone, Copy)]
pub struct FileRule {
    pub field: &'static str,
    pub label: &'static str,
    pub required: bool,
    pub max_bytes: u64,
    pub accept: fn(&str) -> Option<FileKind>,
}

/// Markdown/text or an image, for the post body.
pub fn accept_post_body(media_type: &str) -> Option<FileKind> {
    match media_type {
        "text/markdown" | "text/x-markdown" | "text/plain" => Some(FileKind::Text),
        other => accept_image(other),
    }
}

pub fn accept_image(media_type: &str) -> Option<FileKind> {
    ImageFormat::from_media_type(media_type).map(FileKind::Image)
}

pub const POST_FILE: FileRule = FileRule {
    field: "file",
    label: "File",
    required: true,
    max_bytes: MAX_FILE_BYTES,
    accept: accept_post_body,
};

pub const HEADER_IMAGE: FileRule = FileRule {
    field: "header",
    label: "Header image",
    required: false,
    max_bytes: MAX_FILE_BYTES,
    accept: accept_image,
};

pub const IMAGE_FILE: FileRule = FileRule {
    field: "file",
    label: "File",
    required: true,
    max_bytes: MAX_FILE_BYTES,
    accept: accept_image,
};

/// A file that passed its rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedFile {
    pub kind: FileKind,
    pub meta: FileMeta,
    pub bytes: Vec<u8>,
}

impl AcceptedFile {
    fn into_content(self) -> UploadedContent {
        match self.kind {
            FileKind::Text => UploadedContent::GenericFile {
                meta: self.meta,
                bytes: self.bytes,
            },
            FileKind::Image(format) => UploadedContent::Image(ImageUpload {
                format,
                meta: self.meta,
                bytes: self.bytes,
            }),
        }
    }

    fn into_image(self, field: &str) -> Result<ImageUpload, FieldError> {
        match self.into_content() {
            UploadedContent::Image(image) => Ok(image),
            _ => Err(FieldError::new(field, "Expected an image")),
        }
    }
}

impl FileRule {
    pub fn check(&self, file: Option<RawFile>) -> Result<Option<AcceptedFile>, FieldError> {
        let Some(file) = file else {
            return if self.required {
                Err(FieldError::new(
                    self.field,
                    format!("{} is required", self.label),
                ))
            } else {
                Ok(None)
            };
        };

        if file.size > self.max_bytes {
            return Err(FieldError::new(
                self.field,
                format!(
                    "{} size must be less than {}MB",
                    self.label,
                    self.max_bytes / (1024 * 1024)
                ),
            ));
        }

        let media_type = file.effective_media_type();
        let kind = media_type.as_deref().and_then(self.accept).ok_or_else(|| {
            FieldError::new(
                self.field,
                format!(
                    "{} type {} is not accepted",
                    self.label,
                    media_type.as_deref().unwrap_or("unknown")
                ),
            )
        })?;

        Ok(Some(AcceptedFile {
            kind,
            meta: FileMeta {
                media_type: media_type.unwrap_or_default(),
                size: file.size,
                original_name: file.name,
            },
            bytes: file.bytes,
        }))
    }
}

/// Collects per-field outcomes so every failing field gets reported.
#[derive(Default)]
struct Errors(Vec<FieldError>);

impl Errors {
    fn take<T>(&mut self, result: Result<T, FieldError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.0.push(err);
                None
            }
        }
    }
}

/// Validate a create-post form.
pub fn validate_post_form(form: RawPostForm) -> Result<Validated<PostDraft>, Vec<FieldError>> {
    let mut errors = Errors::default();

    let content = match (form.file, form.markdown) {
        (Some(file), _) => errors
            .take(POST_FILE.check(Some(file)))
            .flatten()
            .map(AcceptedFile::into_content),
        (None, Some(text)) if !text.is_empty() => {
            errors.take(check_inline_markdown(text, POST_FILE))
        }
        (None, _) => errors.take(POST_FILE.check(None)).flatten().map(AcceptedFile::into_content),
    };

    let header = errors
        .take(HEADER_IMAGE.check(form.header))
        .flatten()
        .and_then(|file| errors.take(file.into_image(HEADER_IMAGE.field)));

    let token = errors.take(TOKEN.require(form.token.as_deref()));
    let title = errors.take(TITLE.require(form.title.as_deref()));
    let description = errors.take(DESCRIPTION.check(form.description.as_deref()));
    let category = errors.take(CATEGORY.require(form.category.as_deref()));
    let tags = errors.take(TAGS.check(form.tags.as_deref()));

    match (content, token, title, description, category, tags) {
        (Some(content), Some(token), Some(title), Some(description), Some(category), Some(tags))
            if errors.0.is_empty() =>
        {
            Ok(Validated {
                value: PostDraft {
                    content,
                    header,
                    title,
                    description,
                    category,
                    tags,
                },
                token,
            })
        }
        _ => Err(errors.0),
    }
}

/// Validate a standalone image upload form.
pub fn validate_image_form(form: RawImageForm) -> Result<Validated<ImageUpload>, Vec<FieldError>> {
    let mut errors = Errors::default();

    let image = errors
        .take(IMAGE_FILE.check(form.file))
        .flatten()
        .and_then(|file| errors.take(file.into_image(IMAGE_FILE.field)));
    let token = errors.take(TOKEN.require(form.token.as_deref()));

    match (image, token) {
        (Some(value), Some(token)) if errors.0.is_empty() => Ok(Validated { value, token }),
        _ => Err(errors.0),
    }
}

fn check_inline_markdown(text: String, rule: FileRule) -> Result<UploadedContent, FieldError> {
    if text.len() as u64 > rule.max_bytes {
        return Err(FieldError::new(
            "markdown",
            format!(
                "Markdown must be less than {}MB",
                rule.max_bytes / (1024 * 1024)
            ),
        ));
    }
    Ok(UploadedContent::MarkdownText { text })
}
