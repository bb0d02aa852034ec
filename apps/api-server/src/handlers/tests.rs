use std::sync::Arc;

use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use folio_core::validation::MAX_FILE_BYTES;
use folio_core::ports::BlobStore;
use folio_infra::{InMemoryBlobStore, InMemoryPostRepository};
use serde_json::Value;

use super::configure_routes;
use crate::state::AppState;

const SECRET: &str = "handler-secret";
const BOUNDARY: &str = "folio-test-boundary";

enum Part<'a> {
    Text(&'a str, &'a str),
    RawText(&'a str, &'a [u8]),
    File {
        name: &'a str,
        file_name: &'a str,
        content_type: &'a str,
        bytes: Vec<u8>,
    },
}

fn multipart(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::RawText(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value);
            }
            Part::File {
                name,
                file_name,
                content_type,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn post_request(uri: &str, parts: &[Part<'_>]) -> test::TestRequest {
    test::TestRequest::post()
        .uri(uri)
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(multipart(parts))
}

fn markdown_file(body: &str) -> Part<'static> {
    Part::File {
        name: "file",
        file_name: "post.md",
        content_type: "text/markdown",
        bytes: body.as_bytes().to_vec(),
    }
}

fn test_state() -> AppState {
    AppState::with_stores(
        Arc::new(InMemoryPostRepository::new()),
        Arc::new(InMemoryBlobStore::new()),
        SECRET,
    )
}

macro_rules! app {
    () => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(test_state()))
                .configure(configure_routes),
        )
        .await
    };
}

#[actix_rt::test]
async fn test_health_returns_ok_text() {
    let app = app!();

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(test::read_body(resp).await, "OK");
}

#[actix_rt::test]
async fn test_publish_fetch_and_delete() {
    let app = app!();

    let req = post_request(
        "/upload",
        &[
            markdown_file("# Hello\n\nFirst post."),
            Part::Text("token", SECRET),
            Part::Text("title", "Hello World"),
            Part::Text("category", "general"),
            Part::Text("tags", "rust,web"),
        ],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["slug"], "hello-world");
    let post_id = created["postId"].as_str().unwrap().to_string();
    assert!(created["contentKey"].as_str().unwrap().ends_with("-post.md"));
    assert!(created.get("headerKey").is_none());

    let req = test::TestRequest::get().uri("/list").to_request();
    let listed: Value = test::call_and_read_body_json(&app, req).await;
    let posts = listed["posts"].as_array().unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["id"], post_id.as_str());
    assert!(posts[0].get("markdown").is_none());

    let req = test::TestRequest::get()
        .uri("/post/hello-world")
        .to_request();
    let fetched: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched["post"]["id"], post_id.as_str());
    assert_eq!(fetched["post"]["markdown"], "# Hello\n\nFirst post.");
    assert_eq!(fetched["post"]["tags"], "rust,web");

    let req = test::TestRequest::delete()
        .uri(&format!("/post/{post_id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let deleted: Value = test::read_body_json(resp).await;
    assert_eq!(deleted["message"], "Post deleted");

    let req = test::TestRequest::get()
        .uri(&format!("/post/{post_id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_create_blog_accepts_inline_markdown() {
    let app = app!();

    let req = post_request(
        "/create-blog",
        &[
            Part::Text("markdown", "Inline body"),
            Part::Text("token", SECRET),
            Part::Text("title", "Inline"),
            Part::Text("category", "notes"),
        ],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/post/inline").to_request();
    let fetched: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched["post"]["markdown"], "Inline body");
}

#[actix_rt::test]
async fn test_wrong_token_is_forbidden() {
    let app = app!();

    let req = post_request(
        "/upload",
        &[
            markdown_file("body"),
            Part::Text("token", "not-the-secret"),
            Part::Text("title", "Sneaky"),
            Part::Text("category", "general"),
        ],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["title"], "Forbidden");

    let req = test::TestRequest::get().uri("/list").to_request();
    let listed: Value = test::call_and_read_body_json(&app, req).await;
    assert!(listed["posts"].as_array().unwrap().is_empty());
}

#[actix_rt::test]
async fn test_missing_fields_are_listed() {
    let app = app!();

    let req = post_request("/upload", &[Part::Text("token", SECRET)]).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"file"));
    assert!(fields.contains(&"title"));
    assert!(fields.contains(&"category"));
}

#[actix_rt::test]
async fn test_oversized_file_is_rejected() {
    let app = app!();

    let req = post_request(
        "/upload",
        &[
            Part::File {
                name: "file",
                file_name: "huge.md",
                content_type: "text/markdown",
                bytes: vec![b'a'; MAX_FILE_BYTES as usize + 1],
            },
            Part::Text("token", SECRET),
            Part::Text("title", "Huge"),
            Part::Text("category", "general"),
        ],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["errors"][0]["field"], "file");
    assert_eq!(body["errors"][0]["message"], "File size must be less than 10MB");
}

#[actix_rt::test]
async fn test_unknown_post_is_not_found() {
    let app = app!();

    let req = test::TestRequest::get().uri("/post/nope").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"], "Post not found");

    let req = test::TestRequest::delete().uri("/post/nope").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_image_upload() {
    let app = app!();

    let req = post_request(
        "/upload-img",
        &[
            Part::File {
                name: "file",
                file_name: "diagram.png",
                content_type: "image/png",
                bytes: vec![0x89, b'P', b'N', b'G'],
            },
            Part::Text("token", SECRET),
        ],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["key"].as_str().unwrap().ends_with("-diagram.png"));

    let req = post_request(
        "/upload-img",
        &[markdown_file("not an image"), Part::Text("token", SECRET)],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn test_unexpected_parts_are_not_stored() {
    let blobs = Arc::new(InMemoryBlobStore::new());
    let state = AppState::with_stores(
        Arc::new(InMemoryPostRepository::new()),
        blobs.clone(),
        SECRET,
    );
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(configure_routes),
    )
    .await;

    let req = post_request(
        "/upload",
        &[
            Part::File {
                name: "junk",
                file_name: "junk.md",
                content_type: "text/markdown",
                bytes: vec![b'j'; 64 * 1024],
            },
            Part::Text("extra", "ignored"),
            markdown_file("kept"),
            Part::Text("token", SECRET),
            Part::Text("title", "With Junk"),
            Part::Text("category", "general"),
        ],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let entries = blobs.list().await.unwrap();
    assert_eq!(entries.len(), 1);
    assert!(entries[0].key.ends_with("-post.md"));
    assert_eq!(entries[0].size, 4);
}

#[actix_rt::test]
async fn test_non_utf8_text_field_is_a_field_error() {
    let app = app!();

    let req = post_request(
        "/upload",
        &[
            markdown_file("body"),
            Part::Text("token", SECRET),
            Part::RawText("title", &[0x66, 0xff, 0xfe, 0x6f]),
            Part::Text("category", "general"),
        ],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["errors"][0]["field"], "title");
    assert_eq!(body["errors"][0]["message"], "title must be valid UTF-8 text");
}
