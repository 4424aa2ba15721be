//! PostgreSQL-backed `RelationshipRepository`.
//!
//! Follower and following listings join `users` explicitly because the edge
//! table references `users` twice.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::{Page, PageRequest};

use crate::domain::ports::{RelationshipRepository, RepositoryError};
use crate::domain::{Relationship, User, UserId};

use super::diesel_basic_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewRelationshipRow, RelationshipRow, UserRow};
use super::pool::DbPool;
use super::schema::{relationships, users};

#[derive(Clone)]
pub struct DieselRelationshipRepository {
    pool: DbPool,
}

impl DieselRelationshipRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RelationshipRepository for DieselRelationshipRepository {
    async fn create(
        &self,
        follower_id: UserId,
        followed_id: UserId,
    ) -> Result<Relationship, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(relationships::table)
            .values(&NewRelationshipRow {
                follower_id: follower_id.get(),
                followed_id: followed_id.get(),
            })
            .returning(RelationshipRow::as_returning())
            .get_result(&mut conn)
            .await
            .map(Relationship::from)
            .map_err(map_diesel_error)
    }

    async fn exists(
        &self,
        follower_id: UserId,
        followed_id: UserId,
    ) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(diesel::dsl::exists(
            relationships::table
                .filter(relationships::follower_id.eq(follower_id.get()))
                .filter(relationships::followed_id.eq(followed_id.get())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn delete(
        &self,
        follower_id: UserId,
        followed_id: UserId,
    ) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(
            relationships::table
                .filter(relationships::follower_id.eq(follower_id.get()))
                .filter(relationships::followed_id.eq(followed_id.get())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }

    async fn followers(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> Result<Page<User>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = relationships::table
            .filter(relationships::followed_id.eq(user_id.get()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows: Vec<UserRow> = relationships::table
            .inner_join(users::table.on(users::id.eq(relationships::follower_id)))
            .filter(relationships::followed_id.eq(user_id.get()))
            .select(UserRow::as_select())
            .order((relationships::created_at.desc(), relationships::id.desc()))
            .limit(page.limit())
            .offset(page.offset())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(Page::new(
            rows.into_iter().map(User::from).collect(),
            total,
            page,
        ))
    }

    async fn following(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> Result<Page<User>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = relationships::table
            .filter(relationships::follower_id.eq(user_id.get()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows: Vec<UserRow> = relationships::table
            .inner_join(users::table.on(users::id.eq(relationships::followed_id)))
            .filter(relationships::follower_id.eq(user_id.get()))
            .select(UserRow::as_select())
            .order((relationships::created_at.desc(), relationships::id.desc()))
            .limit(page.limit())
            .offset(page.offset())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(Page::new(
            rows.into_iter().map(User::from).collect(),
            total,
            page,
        ))
    }

    async fn all_following(&self, user_id: UserId) -> Result<Vec<User>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<UserRow> = relationships::table
            .inner_join(users::table.on(users::id.eq(relationships::followed_id)))
            .filter(relationships::follower_id.eq(user_id.get()))
            .select(UserRow::as_select())
            .order((relationships::created_at.desc(), relationships::id.desc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(User::from).collect())
    }
}
