//! Post handlers - create, list, fetch, delete.

use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};
use folio_core::domain::{Post, PostWithBody};
use folio_shared::dto::{
    CreatePostResponse, MessageResponse, PostDetail, PostListResponse, PostResponse, PostSummary,
};

use super::form::FormParts;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// Publish a post from a markdown file (or inline `markdown` field) plus
/// metadata and an optional header image.
///
/// POST /upload, POST /create-blog
pub async fn create_post(
    state: web::Data<AppState>,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let form = FormParts::read(payload).await?.into_post_form();
    let created = state.publisher.create(form).await?;

    Ok(HttpResponse::Ok().json(CreatePostResponse {
        message: "Post uploaded".to_string(),
        post_id: created.id,
        content_key: created.content_key,
        header_key: created.header_key,
        slug: created.slug,
    }))
}

/// GET /list
pub async fn list_posts(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.publisher.list().await?;

    Ok(HttpResponse::Ok().json(PostListResponse {
        posts: posts.into_iter().map(summary).collect(),
    }))
}

/// Fetch a post by id or slug, body included.
///
/// GET /post/{id_or_slug}
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let PostWithBody { post, markdown } = state.publisher.get(&path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(PostResponse {
        post: PostDetail {
            summary: summary(post),
            markdown,
        },
    }))
}

/// DELETE /post/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let outcome = state.publisher.delete(&path.into_inner()).await?;

    let response = if outcome.is_complete() {
        MessageResponse::new("Post deleted")
    } else {
        MessageResponse {
            message: "Post deleted, some stored content could not be removed".to_string(),
            orphaned_keys: outcome.orphaned_keys,
        }
    };

    Ok(HttpResponse::Ok().json(response))
}

fn summary(post: Post) -> PostSummary {
    PostSummary {
        id: post.id,
        title: post.title,
        description: post.description,
        category: post.category,
        tags: post.tags,
        content_key: post.content_key,
        header_key: post.header_key,
        slug: post.slug,
        created_at: post.created_at,
    }
}
