//! CORS policy for browser clients.

use actix_cors::Cors;
use actix_web::http::header;

/// Build the CORS middleware from the configured origins. `*` allows any
/// origin.
pub fn cors(origins: &[String]) -> Cors {
    let base = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(3600);

    origins.iter().fold(base, |cors, origin| {
        if origin == "*" {
            cors.allow_any_origin()
        } else {
            cors.allowed_origin(origin)
        }
    })
}
