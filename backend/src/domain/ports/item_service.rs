//! Driving port for wardrobe items.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Error, Item, ItemFilter, ItemId, ItemStatistics, ItemUpdate, NewItem, UserId};

use super::ImageUpload;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemService: Send + Sync {
    /// Store an item, saving its picture first when one is supplied.
    async fn create_item(&self, item: NewItem, picture: Option<ImageUpload>)
    -> Result<Item, Error>;

    async fn get_item(&self, id: ItemId) -> Result<Item, Error>;

    /// Owner-only partial update. A new picture replaces the old file.
    async fn update_item(
        &self,
        user_id: UserId,
        id: ItemId,
        update: ItemUpdate,
        picture: Option<ImageUpload>,
    ) -> Result<Item, Error>;

    async fn delete_item(&self, user_id: UserId, id: ItemId) -> Result<(), Error>;

    /// Batch delete. Unknown ids are skipped; any foreign id aborts the whole
    /// batch before anything is removed.
    async fn delete_items(&self, user_id: UserId, ids: Vec<ItemId>) -> Result<u64, Error>;

    async fn user_items(&self, user_id: UserId, page: PageRequest) -> Result<Page<Item>, Error>;

    async fn search_items(&self, filter: ItemFilter, page: PageRequest)
    -> Result<Page<Item>, Error>;

    async fn statistics(&self, user_id: UserId) -> Result<ItemStatistics, Error>;
}
