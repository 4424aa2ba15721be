//! PostgreSQL-backed `ItemRepository`.

use async_trait::async_trait;
use diesel::dsl::now;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::{Page, PageRequest};

use crate::domain::ports::{ItemRepository, RepositoryError};
use crate::domain::{CoordinateId, Item, ItemFilter, ItemId, ItemUpdate, NewItem, UserId};

use super::diesel_basic_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{ItemChangeset, ItemRow, NewItemRow};
use super::pool::DbPool;
use super::schema::items;

#[derive(Clone)]
pub struct DieselItemRepository {
    pool: DbPool,
}

impl DieselItemRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Build the `WHERE` clause shared by the count and page queries.
fn filtered(filter: &ItemFilter) -> items::BoxedQuery<'_, Pg> {
    let mut query = items::table.into_boxed();
    if let Some(user_id) = filter.user_id {
        query = query.filter(items::user_id.eq(user_id.get()));
    }
    if let Some(season) = filter.season {
        query = query.filter(items::season.eq(season.code()));
    }
    if let Some(tpo) = filter.tpo {
        query = query.filter(items::tpo.eq(tpo.code()));
    }
    if let Some(color) = filter.color {
        query = query.filter(items::color.eq(color.code()));
    }
    if let Some(label) = filter.super_item.as_deref() {
        query = query.filter(items::super_item.eq(label));
    }
    if let Some(min) = filter.min_rating {
        query = query.filter(items::rating.ge(min));
    }
    if let Some(max) = filter.max_rating {
        query = query.filter(items::rating.le(max));
    }
    query
}

fn into_items(rows: Vec<ItemRow>) -> Result<Vec<Item>, RepositoryError> {
    rows.into_iter().map(ItemRow::into_domain).collect()
}

#[async_trait]
impl ItemRepository for DieselItemRepository {
    async fn create(&self, item: &NewItem) -> Result<Item, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: ItemRow = diesel::insert_into(items::table)
            .values(NewItemRow::from(item))
            .returning(ItemRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row.into_domain()
    }

    async fn find_by_id(&self, id: ItemId) -> Result<Option<Item>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ItemRow> = items::table
            .find(id.get())
            .select(ItemRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(ItemRow::into_domain).transpose()
    }

    async fn find_by_ids(&self, ids: &[ItemId]) -> Result<Vec<Item>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let raw: Vec<i64> = ids.iter().map(|id| id.get()).collect();
        let rows: Vec<ItemRow> = items::table
            .filter(items::id.eq_any(raw))
            .select(ItemRow::as_select())
            .order(items::id.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        into_items(rows)
    }

    async fn find_by_coordinate(&self, id: CoordinateId) -> Result<Vec<Item>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ItemRow> = items::table
            .filter(items::coordinate_id.eq(id.get()))
            .select(ItemRow::as_select())
            .order(items::id.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        into_items(rows)
    }

    async fn all_by_user(&self, user_id: UserId) -> Result<Vec<Item>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ItemRow> = items::table
            .filter(items::user_id.eq(user_id.get()))
            .select(ItemRow::as_select())
            .order((items::created_at.desc(), items::id.desc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        into_items(rows)
    }

    async fn search(
        &self,
        filter: &ItemFilter,
        page: PageRequest,
    ) -> Result<Page<Item>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = filtered(filter)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows: Vec<ItemRow> = filtered(filter)
            .select(ItemRow::as_select())
            .order((items::created_at.desc(), items::id.desc()))
            .limit(page.limit())
            .offset(page.offset())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(Page::new(into_items(rows)?, total, page))
    }

    async fn update(
        &self,
        id: ItemId,
        update: &ItemUpdate,
    ) -> Result<Option<Item>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ItemRow> = diesel::update(items::table.find(id.get()))
            .set((ItemChangeset::from(update), items::updated_at.eq(now)))
            .returning(ItemRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(ItemRow::into_domain).transpose()
    }

    async fn delete(&self, id: ItemId) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(items::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }

    async fn delete_many(&self, ids: &[ItemId]) -> Result<u64, RepositoryError> {
        if ids.is_empty() {
            return Ok(0);
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let raw: Vec<i64> = ids.iter().map(|id| id.get()).collect();
        let removed = diesel::delete(items::table.filter(items::id.eq_any(raw)))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(removed as u64)
    }
}
