//! PostgreSQL-backed `BlockRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{BlockRepository, RepositoryError};
use crate::domain::{Block, User, UserId};

use super::diesel_basic_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{BlockRow, NewBlockRow, UserRow};
use super::pool::DbPool;
use super::schema::{blocks, users};

#[derive(Clone)]
pub struct DieselBlockRepository {
    pool: DbPool,
}

impl DieselBlockRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BlockRepository for DieselBlockRepository {
    async fn create(
        &self,
        blocker_id: UserId,
        blocked_id: UserId,
    ) -> Result<Block, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(blocks::table)
            .values(&NewBlockRow {
                blocker_id: blocker_id.get(),
                blocked_id: blocked_id.get(),
            })
            .returning(BlockRow::as_returning())
            .get_result(&mut conn)
            .await
            .map(Block::from)
            .map_err(map_diesel_error)
    }

    async fn exists(
        &self,
        blocker_id: UserId,
        blocked_id: UserId,
    ) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(diesel::dsl::exists(
            blocks::table
                .filter(blocks::blocker_id.eq(blocker_id.get()))
                .filter(blocks::blocked_id.eq(blocked_id.get())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn delete(
        &self,
        blocker_id: UserId,
        blocked_id: UserId,
    ) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(
            blocks::table
                .filter(blocks::blocker_id.eq(blocker_id.get()))
                .filter(blocks::blocked_id.eq(blocked_id.get())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }

    async fn blocked_users(&self, blocker_id: UserId) -> Result<Vec<User>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<UserRow> = blocks::table
            .inner_join(users::table.on(users::id.eq(blocks::blocked_id)))
            .filter(blocks::blocker_id.eq(blocker_id.get()))
            .select(UserRow::as_select())
            .order((blocks::created_at.desc(), blocks::id.desc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(User::from).collect())
    }
}
