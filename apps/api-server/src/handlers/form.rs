//! Multipart body reading.
//!
//! Parts are buffered up to a cap. Anything past the cap is counted but
//! dropped, so an oversized upload still reaches validation with its real
//! size and is rejected there.

use std::collections::HashMap;

use actix_multipart::{Field, Multipart};
use folio_core::error::FieldError;
use folio_core::validation::{MAX_FILE_BYTES, RawFile, RawImageForm, RawPostForm};
use futures::StreamExt;

use crate::middleware::error::AppError;

/// Cap for ordinary text fields.
const TEXT_FIELD_LIMIT: usize = 16 * 1024;

/// Text fields that may carry a whole post body.
const LONG_TEXT_FIELDS: &[&str] = &["markdown"];

/// Parts read into forms. Anything else is drained unbuffered.
const FILE_FIELDS: &[&str] = &["file", "header"];
const TEXT_FIELDS: &[&str] = &[
    "markdown",
    "token",
    "title",
    "description",
    "category",
    "tags",
];

/// One past the file limit, so an over-limit part is still seen as over.
const FILE_BUFFER_LIMIT: usize = MAX_FILE_BYTES as usize + 1;

/// Named parts of a multipart body.
#[derive(Debug, Default)]
pub struct FormParts {
    files: HashMap<String, RawFile>,
    texts: HashMap<String, String>,
}

impl FormParts {
    /// Drain the multipart stream. Only parts the forms read are buffered: a
    /// named file part with a filename, or a named text part without one.
    /// Repeated names keep the last value.
    pub async fn read(mut payload: Multipart) -> Result<Self, AppError> {
        let mut parts = Self::default();

        while let Some(item) = payload.next().await {
            let mut field = item.map_err(malformed)?;
            let Some(name) = field.name().map(str::to_string) else {
                read_capped(&mut field, 0).await?;
                continue;
            };

            let file_name = field
                .content_disposition()
                .and_then(|cd| cd.get_filename())
                .map(str::to_string);

            match file_name {
                Some(file_name) if FILE_FIELDS.contains(&name.as_str()) => {
                    let media_type = field.content_type().map(|m| m.essence_str().to_string());
                    let (bytes, size) = read_capped(&mut field, FILE_BUFFER_LIMIT).await?;
                    parts.files.insert(
                        name,
                        RawFile {
                            name: file_name,
                            media_type,
                            size,
                            bytes,
                        },
                    );
                }
                None if TEXT_FIELDS.contains(&name.as_str()) => {
                    let limit = if LONG_TEXT_FIELDS.contains(&name.as_str()) {
                        FILE_BUFFER_LIMIT
                    } else {
                        TEXT_FIELD_LIMIT
                    };
                    let (bytes, size) = read_capped(&mut field, limit).await?;
                    let text = decode_text(&name, bytes, size)?;
                    parts.texts.insert(name, text);
                }
                _ => {
                    tracing::debug!(field = %name, "Ignoring unexpected multipart field");
                    read_capped(&mut field, 0).await?;
                }
            }
        }

        Ok(parts)
    }

    pub fn into_post_form(mut self) -> RawPostForm {
        RawPostForm {
            file: self.files.remove("file"),
            markdown: self.texts.remove("markdown"),
            header: self.files.remove("header"),
            token: self.texts.remove("token"),
            title: self.texts.remove("title"),
            description: self.texts.remove("description"),
            category: self.texts.remove("category"),
            tags: self.texts.remove("tags"),
        }
    }

    pub fn into_image_form(mut self) -> RawImageForm {
        RawImageForm {
            file: self.files.remove("file"),
            token: self.texts.remove("token"),
        }
    }
}

/// Read a part to the end, keeping at most `limit` bytes. Returns the kept
/// bytes and the full size seen.
async fn read_capped(field: &mut Field, limit: usize) -> Result<(Vec<u8>, u64), AppError> {
    let mut buf = Vec::new();
    let mut size: u64 = 0;

    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(malformed)?;
        size += chunk.len() as u64;
        if buf.len() < limit {
            let room = limit - buf.len();
            buf.extend_from_slice(&chunk[..chunk.len().min(room)]);
        }
    }

    Ok((buf, size))
}

/// Text parts must be UTF-8. A part cut off at its cap may end mid-character
/// and is decoded lossily; validation rejects it for length anyway.
fn decode_text(name: &str, bytes: Vec<u8>, size: u64) -> Result<String, AppError> {
    if size > bytes.len() as u64 {
        return Ok(String::from_utf8_lossy(&bytes).into_owned());
    }
    String::from_utf8(bytes).map_err(|_| {
        AppError::Validation(vec![FieldError::new(
            name,
            format!("{name} must be valid UTF-8 text"),
        )])
    })
}

fn malformed(err: actix_multipart::MultipartError) -> AppError {
    AppError::BadRequest(format!("Malformed multipart body: {err}"))
}
