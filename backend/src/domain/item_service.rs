//! Wardrobe item service.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use super::ports::{ImageFolder, ImageStore, ImageUpload, ItemRepository, ItemService};
use super::repository_errors::{discard_picture, map_repository_error, store_picture};
use super::{Error, Item, ItemFilter, ItemId, ItemStatistics, ItemUpdate, NewItem, UserId};

#[derive(Clone)]
pub struct ItemServiceImpl {
    items: Arc<dyn ItemRepository>,
    images: Arc<dyn ImageStore>,
}

impl ItemServiceImpl {
    pub fn new(items: Arc<dyn ItemRepository>, images: Arc<dyn ImageStore>) -> Self {
        Self { items, images }
    }

    async fn owned_item(&self, user_id: UserId, id: ItemId) -> Result<Item, Error> {
        let item = self
            .items
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("item {id} not found")))?;
        if item.user_id != user_id {
            return Err(Error::forbidden("item belongs to another user"));
        }
        Ok(item)
    }
}

#[async_trait]
impl ItemService for ItemServiceImpl {
    async fn create_item(
        &self,
        mut item: NewItem,
        picture: Option<ImageUpload>,
    ) -> Result<Item, Error> {
        let stored = store_picture(self.images.as_ref(), ImageFolder::Items, picture.as_ref())?;
        if stored.is_some() {
            item.picture.clone_from(&stored);
        }
        match self.items.create(&item).await {
            Ok(created) => Ok(created),
            Err(error) => {
                discard_picture(self.images.as_ref(), stored.as_deref());
                Err(map_repository_error(error))
            }
        }
    }

    async fn get_item(&self, id: ItemId) -> Result<Item, Error> {
        self.items
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("item {id} not found")))
    }

    async fn update_item(
        &self,
        user_id: UserId,
        id: ItemId,
        mut update: ItemUpdate,
        picture: Option<ImageUpload>,
    ) -> Result<Item, Error> {
        let current = self.owned_item(user_id, id).await?;
        let stored = store_picture(self.images.as_ref(), ImageFolder::Items, picture.as_ref())?;
        if stored.is_some() {
            update.picture.clone_from(&stored);
        }
        let updated = match self.items.update(id, &update).await {
            Ok(Some(item)) => item,
            Ok(None) => {
                discard_picture(self.images.as_ref(), stored.as_deref());
                return Err(Error::not_found(format!("item {id} not found")));
            }
            Err(error) => {
                discard_picture(self.images.as_ref(), stored.as_deref());
                return Err(map_repository_error(error));
            }
        };
        if stored.is_some() {
            discard_picture(self.images.as_ref(), current.picture.as_deref());
        }
        Ok(updated)
    }

    async fn delete_item(&self, user_id: UserId, id: ItemId) -> Result<(), Error> {
        let item = self.owned_item(user_id, id).await?;
        let removed = self.items.delete(id).await.map_err(map_repository_error)?;
        if !removed {
            return Err(Error::not_found(format!("item {id} not found")));
        }
        discard_picture(self.images.as_ref(), item.picture.as_deref());
        Ok(())
    }

    async fn delete_items(&self, user_id: UserId, ids: Vec<ItemId>) -> Result<u64, Error> {
        if ids.is_empty() {
            return Err(Error::invalid_request("item_ids must not be empty"));
        }
        let found = self
            .items
            .find_by_ids(&ids)
            .await
            .map_err(map_repository_error)?;
        if let Some(foreign) = found.iter().find(|item| item.user_id != user_id) {
            return Err(Error::forbidden(format!(
                "item {} belongs to another user",
                foreign.id
            )));
        }
        let owned: Vec<ItemId> = found.iter().map(|item| item.id).collect();
        if owned.is_empty() {
            return Ok(0);
        }
        let removed = self
            .items
            .delete_many(&owned)
            .await
            .map_err(map_repository_error)?;
        for item in &found {
            discard_picture(self.images.as_ref(), item.picture.as_deref());
        }
        Ok(removed)
    }

    async fn user_items(&self, user_id: UserId, page: PageRequest) -> Result<Page<Item>, Error> {
        self.items
            .search(&ItemFilter::for_user(user_id), page)
            .await
            .map_err(map_repository_error)
    }

    async fn search_items(
        &self,
        filter: ItemFilter,
        page: PageRequest,
    ) -> Result<Page<Item>, Error> {
        self.items
            .search(&filter, page)
            .await
            .map_err(map_repository_error)
    }

    async fn statistics(&self, user_id: UserId) -> Result<ItemStatistics, Error> {
        let items = self
            .items
            .all_by_user(user_id)
            .await
            .map_err(map_repository_error)?;
        Ok(ItemStatistics::from_items(&items))
    }
}

#[cfg(test)]
#[path = "item_service_tests.rs"]
mod tests;
