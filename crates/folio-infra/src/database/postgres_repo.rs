//! PostgreSQL metadata store.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, SqlErr,
};

use folio_core::domain::Post;
use folio_core::error::RepoError;
use folio_core::ports::PostRepository;

use super::entity::post::{self, Entity as PostEntity};

/// PostgreSQL post repository. Relies on the unique index on `posts.slug`.
pub struct PostgresPostRepository {
    db: DbConn,
}

impl PostgresPostRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

fn query_error(err: DbErr) -> RepoError {
    match err {
        DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => RepoError::Connection(err.to_string()),
        _ => RepoError::Query(err.to_string()),
    }
}

fn insert_error(err: DbErr, slug: &str) -> RepoError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) if detail.contains("slug") => {
            RepoError::DuplicateSlug(slug.to_string())
        }
        Some(SqlErr::UniqueConstraintViolation(detail)) => RepoError::Constraint(detail),
        _ => query_error(err),
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        tracing::debug!(post_id = %post.id, slug = %post.slug, "Inserting post");

        let slug = post.slug.clone();
        let model = post::ActiveModel::from(post)
            .insert(&self.db)
            .await
            .map_err(|e| insert_error(e, &slug))?;

        Ok(model.into())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Post>, RepoError> {
        let result = PostEntity::find_by_id(id.to_owned())
            .one(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }

    async fn list_recent(&self) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .order_by_desc(post::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn slugs_with_prefix(&self, prefix: &str) -> Result<Vec<String>, RepoError> {
        PostEntity::find()
            .select_only()
            .column(post::Column::Slug)
            .filter(post::Column::Slug.starts_with(prefix))
            .into_tuple::<String>()
            .all(&self.db)
            .await
            .map_err(query_error)
    }

    async fn delete(&self, id: &str) -> Result<(), RepoError> {
        let result = PostEntity::delete_by_id(id.to_owned())
            .exec(&self.db)
            .await
            .map_err(query_error)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}
