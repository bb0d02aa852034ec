//! Health check endpoint.

use actix_web::HttpResponse;

/// Liveness probe.
///
/// GET /health
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().content_type("text/plain").body("OK")
}
