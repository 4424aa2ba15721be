//! Port for wardrobe item persistence.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{CoordinateId, Item, ItemFilter, ItemId, ItemUpdate, NewItem, UserId};

use super::RepositoryError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemRepository: Send + Sync {
    async fn create(&self, item: &NewItem) -> Result<Item, RepositoryError>;

    async fn find_by_id(&self, id: ItemId) -> Result<Option<Item>, RepositoryError>;

    /// Fetch the subset of `ids` that exist, in no particular order.
    async fn find_by_ids(&self, ids: &[ItemId]) -> Result<Vec<Item>, RepositoryError>;

    /// Items currently linked to a coordinate.
    async fn find_by_coordinate(&self, id: CoordinateId) -> Result<Vec<Item>, RepositoryError>;

    /// Every item a user owns, newest first.
    async fn all_by_user(&self, user_id: UserId) -> Result<Vec<Item>, RepositoryError>;

    /// Filtered page, newest first.
    async fn search(
        &self,
        filter: &ItemFilter,
        page: PageRequest,
    ) -> Result<Page<Item>, RepositoryError>;

    async fn update(&self, id: ItemId, update: &ItemUpdate)
    -> Result<Option<Item>, RepositoryError>;

    async fn delete(&self, id: ItemId) -> Result<bool, RepositoryError>;

    /// Delete every listed item, returning how many rows went away.
    async fn delete_many(&self, ids: &[ItemId]) -> Result<u64, RepositoryError>;
}
