//! Item and coordinate repositories over the in-memory tables.
//!
//! Holding the table lock for the whole call gives coordinate writes the
//! same all-or-nothing behaviour as the SQL transactions.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::ports::{CoordinateRepository, ItemRepository, RepositoryError};
use crate::domain::{
    Coordinate, CoordinateFilter, CoordinateId, CoordinateUpdate, Item, ItemFilter, ItemId,
    ItemUpdate, NewCoordinate, NewItem, UserId,
};

use super::{InMemoryStore, Tables, newest_first};

fn total_of<T>(rows: &[T]) -> i64 {
    i64::try_from(rows.len()).unwrap_or(i64::MAX)
}

fn link_items(tables: &mut Tables, coordinate_id: CoordinateId, item_ids: &[ItemId]) {
    for id in item_ids {
        if let Some(item) = tables.items.get_mut(&id.get()) {
            item.coordinate_id = Some(coordinate_id);
        }
    }
}

fn coordinates_newest_first(mut rows: Vec<Coordinate>) -> Vec<Coordinate> {
    newest_first(&mut rows, |row| (row.created_at, row.id.get()));
    rows
}

#[async_trait]
impl ItemRepository for InMemoryStore {
    async fn create(&self, item: &NewItem) -> Result<Item, RepositoryError> {
        let now = self.now();
        let mut tables = self.tables()?;
        let id = tables.allocate_id();
        let row = Item {
            id: ItemId::new(id),
            user_id: item.user_id,
            coordinate_id: None,
            super_item: item.super_item.clone(),
            season: item.season,
            tpo: item.tpo,
            color: item.color,
            content: item.content.clone(),
            memo: item.memo.clone(),
            picture: item.picture.clone(),
            rating: item.rating,
            created_at: now,
            updated_at: now,
        };
        tables.items.insert(id, row.clone());
        Ok(row)
    }

    async fn find_by_id(&self, id: ItemId) -> Result<Option<Item>, RepositoryError> {
        Ok(self.tables()?.items.get(&id.get()).cloned())
    }

    async fn find_by_ids(&self, ids: &[ItemId]) -> Result<Vec<Item>, RepositoryError> {
        let tables = self.tables()?;
        Ok(tables
            .items
            .values()
            .filter(|item| ids.contains(&item.id))
            .cloned()
            .collect())
    }

    async fn find_by_coordinate(&self, id: CoordinateId) -> Result<Vec<Item>, RepositoryError> {
        let tables = self.tables()?;
        Ok(tables
            .items
            .values()
            .filter(|item| item.coordinate_id == Some(id))
            .cloned()
            .collect())
    }

    async fn all_by_user(&self, user_id: UserId) -> Result<Vec<Item>, RepositoryError> {
        let mut rows: Vec<Item> = self
            .tables()?
            .items
            .values()
            .filter(|item| item.user_id == user_id)
            .cloned()
            .collect();
        newest_first(&mut rows, |row| (row.created_at, row.id.get()));
        Ok(rows)
    }

    async fn search(
        &self,
        filter: &ItemFilter,
        page: PageRequest,
    ) -> Result<Page<Item>, RepositoryError> {
        let mut rows: Vec<Item> = self
            .tables()?
            .items
            .values()
            .filter(|item| filter.matches(item))
            .cloned()
            .collect();
        newest_first(&mut rows, |row| (row.created_at, row.id.get()));
        Ok(Page::new(page.slice(&rows), total_of(&rows), page))
    }

    async fn update(
        &self,
        id: ItemId,
        update: &ItemUpdate,
    ) -> Result<Option<Item>, RepositoryError> {
        let now = self.now();
        let mut tables = self.tables()?;
        let Some(item) = tables.items.get_mut(&id.get()) else {
            return Ok(None);
        };
        update.apply_to(item);
        item.updated_at = now;
        Ok(Some(item.clone()))
    }

    async fn delete(&self, id: ItemId) -> Result<bool, RepositoryError> {
        Ok(self.tables()?.items.remove(&id.get()).is_some())
    }

    async fn delete_many(&self, ids: &[ItemId]) -> Result<u64, RepositoryError> {
        let mut tables = self.tables()?;
        let removed = ids
            .iter()
            .filter(|id| tables.items.remove(&id.get()).is_some())
            .count();
        Ok(u64::try_from(removed).unwrap_or(u64::MAX))
    }
}

#[async_trait]
impl CoordinateRepository for InMemoryStore {
    async fn create_with_items(
        &self,
        coordinate: &NewCoordinate,
        item_ids: &[ItemId],
    ) -> Result<Coordinate, RepositoryError> {
        let now = self.now();
        let mut tables = self.tables()?;
        let id = tables.allocate_id();
        let row = Coordinate {
            id: CoordinateId::new(id),
            user_id: coordinate.user_id,
            season: coordinate.season,
            tpo: coordinate.tpo,
            picture: coordinate.picture.clone(),
            memo: coordinate.memo.clone(),
            rating: coordinate.rating,
            sizes: coordinate.sizes,
            created_at: now,
            updated_at: now,
        };
        tables.coordinates.insert(id, row.clone());
        link_items(&mut tables, row.id, item_ids);
        Ok(row)
    }

    async fn find_by_id(&self, id: CoordinateId) -> Result<Option<Coordinate>, RepositoryError> {
        Ok(self.tables()?.coordinates.get(&id.get()).cloned())
    }

    async fn update_with_items(
        &self,
        id: CoordinateId,
        update: &CoordinateUpdate,
        item_ids: Option<Vec<ItemId>>,
    ) -> Result<Option<Coordinate>, RepositoryError> {
        let now = self.now();
        let mut tables = self.tables()?;
        let Some(coordinate) = tables.coordinates.get_mut(&id.get()) else {
            return Ok(None);
        };
        update.apply_to(coordinate);
        coordinate.updated_at = now;
        let updated = coordinate.clone();
        if let Some(linked) = item_ids {
            for item in tables.items.values_mut() {
                if item.coordinate_id == Some(id) {
                    item.coordinate_id = None;
                }
            }
            link_items(&mut tables, id, &linked);
        }
        Ok(Some(updated))
    }

    async fn delete(&self, id: CoordinateId) -> Result<bool, RepositoryError> {
        Ok(self.tables()?.drop_coordinate(id.get()))
    }

    async fn search(
        &self,
        filter: &CoordinateFilter,
        page: PageRequest,
    ) -> Result<Page<Coordinate>, RepositoryError> {
        let rows = coordinates_newest_first(
            self.tables()?
                .coordinates
                .values()
                .filter(|coordinate| filter.matches(coordinate))
                .cloned()
                .collect(),
        );
        Ok(Page::new(page.slice(&rows), total_of(&rows), page))
    }

    async fn recent_by_user(
        &self,
        user_id: UserId,
        limit: i64,
    ) -> Result<Vec<Coordinate>, RepositoryError> {
        let mut rows = CoordinateRepository::all_by_user(self, user_id).await?;
        rows.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(rows)
    }

    async fn all_by_user(&self, user_id: UserId) -> Result<Vec<Coordinate>, RepositoryError> {
        Ok(coordinates_newest_first(
            self.tables()?
                .coordinates
                .values()
                .filter(|coordinate| coordinate.user_id == user_id)
                .cloned()
                .collect(),
        ))
    }
}
