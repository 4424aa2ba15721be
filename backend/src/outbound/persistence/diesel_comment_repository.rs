//! PostgreSQL-backed `CommentRepository`.

use async_trait::async_trait;
use diesel::dsl::now;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::{Page, PageRequest};

use crate::domain::ports::{CommentRepository, RepositoryError};
use crate::domain::{Comment, CommentBody, CommentId, CoordinateId, NewComment};

use super::diesel_basic_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{CommentRow, NewCommentRow};
use super::pool::DbPool;
use super::schema::comments;

#[derive(Clone)]
pub struct DieselCommentRepository {
    pool: DbPool,
}

impl DieselCommentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for DieselCommentRepository {
    async fn create(&self, comment: &NewComment) -> Result<Comment, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewCommentRow {
            user_id: comment.user_id.get(),
            coordinate_id: comment.coordinate_id.get(),
            comment: comment.body.as_str(),
        };
        diesel::insert_into(comments::table)
            .values(&row)
            .returning(CommentRow::as_returning())
            .get_result(&mut conn)
            .await
            .map(Comment::from)
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: CommentId) -> Result<Option<Comment>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        comments::table
            .find(id.get())
            .select(CommentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map(|row| row.map(Comment::from))
            .map_err(map_diesel_error)
    }

    async fn update_body(
        &self,
        id: CommentId,
        body: &CommentBody,
    ) -> Result<Option<Comment>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(comments::table.find(id.get()))
            .set((
                comments::comment.eq(body.as_str()),
                comments::updated_at.eq(now),
            ))
            .returning(CommentRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map(|row| row.map(Comment::from))
            .map_err(map_diesel_error)
    }

    async fn delete(&self, id: CommentId) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(comments::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }

    async fn list_by_coordinate(
        &self,
        coordinate_id: CoordinateId,
        page: PageRequest,
    ) -> Result<Page<Comment>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = comments::table
            .filter(comments::coordinate_id.eq(coordinate_id.get()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows: Vec<CommentRow> = comments::table
            .filter(comments::coordinate_id.eq(coordinate_id.get()))
            .select(CommentRow::as_select())
            .order((comments::created_at.desc(), comments::id.desc()))
            .limit(page.limit())
            .offset(page.offset())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(Page::new(
            rows.into_iter().map(Comment::from).collect(),
            total,
            page,
        ))
    }

    async fn count_by_coordinate(
        &self,
        coordinate_id: CoordinateId,
    ) -> Result<i64, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        comments::table
            .filter(comments::coordinate_id.eq(coordinate_id.get()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }
}
