//! HTTP handlers and route configuration.

mod form;
mod health;
mod images;
mod posts;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check))
        .route("/upload", web::post().to(posts::create_post))
        .route("/create-blog", web::post().to(posts::create_post))
        .route("/upload-img", web::post().to(images::upload_image))
        .route("/list", web::get().to(posts::list_posts))
        .service(
            web::resource("/post/{id_or_slug}")
                .route(web::get().to(posts::get_post))
                .route(web::delete().to(posts::delete_post)),
        );
}

#[cfg(test)]
mod tests;
