//! PostgreSQL-backed `CoordinateRepository`.
//!
//! Create, update and delete each run in one transaction covering the
//! coordinate row and the `items.coordinate_id` links.

use async_trait::async_trait;
use diesel::dsl::now;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use pagination::{Page, PageRequest};

use crate::domain::ports::{CoordinateRepository, RepositoryError};
use crate::domain::{
    Coordinate, CoordinateFilter, CoordinateId, CoordinateUpdate, ItemId, NewCoordinate, UserId,
};

use super::diesel_basic_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{CoordinateChangeset, CoordinateRow, NewCoordinateRow};
use super::pool::DbPool;
use super::schema::{coordinates, items};

#[derive(Clone)]
pub struct DieselCoordinateRepository {
    pool: DbPool,
}

impl DieselCoordinateRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn filtered(filter: &CoordinateFilter) -> coordinates::BoxedQuery<'_, Pg> {
    let mut query = coordinates::table.into_boxed();
    if let Some(user_id) = filter.user_id {
        query = query.filter(coordinates::user_id.eq(user_id.get()));
    }
    if let Some(season) = filter.season {
        query = query.filter(coordinates::season.eq(season.code()));
    }
    if let Some(tpo) = filter.tpo {
        query = query.filter(coordinates::tpo.eq(tpo.code()));
    }
    if let Some(min) = filter.min_rating {
        query = query.filter(coordinates::rating.ge(min));
    }
    if let Some(max) = filter.max_rating {
        query = query.filter(coordinates::rating.le(max));
    }
    query
}

fn raw_ids(ids: &[ItemId]) -> Vec<i64> {
    ids.iter().map(|id| id.get()).collect()
}

fn into_coordinates(rows: Vec<CoordinateRow>) -> Result<Vec<Coordinate>, RepositoryError> {
    rows.into_iter().map(CoordinateRow::into_domain).collect()
}

#[async_trait]
impl CoordinateRepository for DieselCoordinateRepository {
    async fn create_with_items(
        &self,
        coordinate: &NewCoordinate,
        item_ids: &[ItemId],
    ) -> Result<Coordinate, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewCoordinateRow::from(coordinate);
        let linked = raw_ids(item_ids);

        let row = conn
            .transaction(|conn| {
                async move {
                    let row: CoordinateRow = diesel::insert_into(coordinates::table)
                        .values(&new_row)
                        .returning(CoordinateRow::as_returning())
                        .get_result(conn)
                        .await?;
                    diesel::update(items::table.filter(items::id.eq_any(linked)))
                        .set((items::coordinate_id.eq(row.id), items::updated_at.eq(now)))
                        .execute(conn)
                        .await?;
                    Ok::<_, diesel::result::Error>(row)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;
        row.into_domain()
    }

    async fn find_by_id(&self, id: CoordinateId) -> Result<Option<Coordinate>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<CoordinateRow> = coordinates::table
            .find(id.get())
            .select(CoordinateRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(CoordinateRow::into_domain).transpose()
    }

    async fn update_with_items(
        &self,
        id: CoordinateId,
        update: &CoordinateUpdate,
        item_ids: Option<Vec<ItemId>>,
    ) -> Result<Option<Coordinate>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = CoordinateChangeset::from(update);
        let relinked = item_ids.as_deref().map(raw_ids);
        let raw_id = id.get();

        let row = conn
            .transaction(|conn| {
                async move {
                    let row: Option<CoordinateRow> =
                        diesel::update(coordinates::table.find(raw_id))
                            .set((changes, coordinates::updated_at.eq(now)))
                            .returning(CoordinateRow::as_returning())
                            .get_result(conn)
                            .await
                            .optional()?;
                    let Some(row) = row else {
                        return Ok::<_, diesel::result::Error>(None);
                    };
                    if let Some(linked) = relinked {
                        diesel::update(items::table.filter(items::coordinate_id.eq(raw_id)))
                            .set((
                                items::coordinate_id.eq(None::<i64>),
                                items::updated_at.eq(now),
                            ))
                            .execute(conn)
                            .await?;
                        diesel::update(items::table.filter(items::id.eq_any(linked)))
                            .set((items::coordinate_id.eq(raw_id), items::updated_at.eq(now)))
                            .execute(conn)
                            .await?;
                    }
                    Ok(Some(row))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;
        row.map(CoordinateRow::into_domain).transpose()
    }

    async fn delete(&self, id: CoordinateId) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let raw_id = id.get();
        let removed = conn
            .transaction(|conn| {
                async move {
                    diesel::update(items::table.filter(items::coordinate_id.eq(raw_id)))
                        .set(items::coordinate_id.eq(None::<i64>))
                        .execute(conn)
                        .await?;
                    diesel::delete(coordinates::table.find(raw_id))
                        .execute(conn)
                        .await
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }

    async fn search(
        &self,
        filter: &CoordinateFilter,
        page: PageRequest,
    ) -> Result<Page<Coordinate>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = filtered(filter)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows: Vec<CoordinateRow> = filtered(filter)
            .select(CoordinateRow::as_select())
            .order((coordinates::created_at.desc(), coordinates::id.desc()))
            .limit(page.limit())
            .offset(page.offset())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(Page::new(into_coordinates(rows)?, total, page))
    }

    async fn recent_by_user(
        &self,
        user_id: UserId,
        limit: i64,
    ) -> Result<Vec<Coordinate>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<CoordinateRow> = coordinates::table
            .filter(coordinates::user_id.eq(user_id.get()))
            .select(CoordinateRow::as_select())
            .order((coordinates::created_at.desc(), coordinates::id.desc()))
            .limit(limit)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        into_coordinates(rows)
    }

    async fn all_by_user(&self, user_id: UserId) -> Result<Vec<Coordinate>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<CoordinateRow> = coordinates::table
            .filter(coordinates::user_id.eq(user_id.get()))
            .select(CoordinateRow::as_select())
            .order((coordinates::created_at.desc(), coordinates::id.desc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        into_coordinates(rows)
    }
}
