//! Standalone image upload.

use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};
use folio_shared::dto::ImageUploadResponse;

use super::form::FormParts;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// Store an image for use inside post bodies.
///
/// POST /upload-img
pub async fn upload_image(
    state: web::Data<AppState>,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let form = FormParts::read(payload).await?.into_image_form();
    let key = state.publisher.create_image(form).await?;

    Ok(HttpResponse::Ok().json(ImageUploadResponse {
        message: "Image uploaded".to_string(),
        key,
    }))
}
