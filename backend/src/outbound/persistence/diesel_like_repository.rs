//! PostgreSQL-backed `LikeRepository`.
//!
//! `like_coordinates_user_coordinate_key` makes a second like for the same
//! pair fail with a unique violation, reported as `Duplicate`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{LikeRepository, RepositoryError};
use crate::domain::{CoordinateId, LikeCoordinate, UserId};

use super::diesel_basic_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{LikeRow, NewLikeRow};
use super::pool::DbPool;
use super::schema::like_coordinates;

#[derive(Clone)]
pub struct DieselLikeRepository {
    pool: DbPool,
}

impl DieselLikeRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LikeRepository for DieselLikeRepository {
    async fn create(
        &self,
        user_id: UserId,
        coordinate_id: CoordinateId,
    ) -> Result<LikeCoordinate, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(like_coordinates::table)
            .values(&NewLikeRow {
                user_id: user_id.get(),
                coordinate_id: coordinate_id.get(),
            })
            .returning(LikeRow::as_returning())
            .get_result(&mut conn)
            .await
            .map(LikeCoordinate::from)
            .map_err(map_diesel_error)
    }

    async fn find(
        &self,
        user_id: UserId,
        coordinate_id: CoordinateId,
    ) -> Result<Option<LikeCoordinate>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        like_coordinates::table
            .filter(like_coordinates::user_id.eq(user_id.get()))
            .filter(like_coordinates::coordinate_id.eq(coordinate_id.get()))
            .select(LikeRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map(|row| row.map(LikeCoordinate::from))
            .map_err(map_diesel_error)
    }

    async fn delete(
        &self,
        user_id: UserId,
        coordinate_id: CoordinateId,
    ) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(
            like_coordinates::table
                .filter(like_coordinates::user_id.eq(user_id.get()))
                .filter(like_coordinates::coordinate_id.eq(coordinate_id.get())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }

    async fn count_by_coordinate(
        &self,
        coordinate_id: CoordinateId,
    ) -> Result<i64, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        like_coordinates::table
            .filter(like_coordinates::coordinate_id.eq(coordinate_id.get()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn list_by_coordinate(
        &self,
        coordinate_id: CoordinateId,
    ) -> Result<Vec<LikeCoordinate>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<LikeRow> = like_coordinates::table
            .filter(like_coordinates::coordinate_id.eq(coordinate_id.get()))
            .select(LikeRow::as_select())
            .order((like_coordinates::created_at.desc(), like_coordinates::id.desc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(LikeCoordinate::from).collect())
    }
}
