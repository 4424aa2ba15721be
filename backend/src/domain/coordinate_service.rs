//! Coordinate service: outfit CRUD, decoration and the timeline.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::{Page, PageRequest};
use tracing::debug;

use super::ports::{
    BlockRepository, CommentRepository, CoordinateRepository, CoordinateService, ImageFolder,
    ImageStore, ImageUpload, ItemRepository, LikeRepository, RelationshipRepository,
    UserRepository,
};
use super::repository_errors::{discard_picture, map_repository_error, store_picture};
use super::{
    Coordinate, CoordinateDetails, CoordinateFilter, CoordinateId, CoordinateStatistics,
    CoordinateUpdate, Error, ItemId, NewCoordinate, TIMELINE_PER_USER, UserId, validate_item_ids,
};

/// Repositories and stores consulted by [`CoordinateServiceImpl`].
#[derive(Clone)]
pub struct CoordinateRepositories {
    pub coordinates: Arc<dyn CoordinateRepository>,
    pub items: Arc<dyn ItemRepository>,
    pub users: Arc<dyn UserRepository>,
    pub likes: Arc<dyn LikeRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub relationships: Arc<dyn RelationshipRepository>,
    pub blocks: Arc<dyn BlockRepository>,
    pub images: Arc<dyn ImageStore>,
}

#[derive(Clone)]
pub struct CoordinateServiceImpl {
    repos: CoordinateRepositories,
}

impl CoordinateServiceImpl {
    pub fn new(repos: CoordinateRepositories) -> Self {
        Self { repos }
    }

    async fn require_coordinate(&self, id: CoordinateId) -> Result<Coordinate, Error> {
        self.repos
            .coordinates
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("coordinate {id} not found")))
    }

    async fn owned_coordinate(
        &self,
        user_id: UserId,
        id: CoordinateId,
    ) -> Result<Coordinate, Error> {
        let coordinate = self.require_coordinate(id).await?;
        if coordinate.user_id != user_id {
            return Err(Error::forbidden("coordinate belongs to another user"));
        }
        Ok(coordinate)
    }

    /// Deduplicate `ids` and check every item exists and belongs to `user_id`.
    async fn check_items(&self, user_id: UserId, ids: &[ItemId]) -> Result<Vec<ItemId>, Error> {
        let ids = validate_item_ids(ids).map_err(|err| Error::invalid_request(err.to_string()))?;
        let found = self
            .repos
            .items
            .find_by_ids(&ids)
            .await
            .map_err(map_repository_error)?;
        if let Some(missing) = ids
            .iter()
            .find(|id| !found.iter().any(|item| item.id == **id))
        {
            return Err(Error::not_found(format!("item {missing} not found")));
        }
        if let Some(foreign) = found.iter().find(|item| item.user_id != user_id) {
            return Err(Error::forbidden(format!(
                "item {} belongs to another user",
                foreign.id
            )));
        }
        Ok(ids)
    }

    async fn decorate(
        &self,
        coordinate: Coordinate,
        viewer: Option<UserId>,
    ) -> Result<CoordinateDetails, Error> {
        let id = coordinate.id;
        let owner = self
            .repos
            .users
            .find_by_id(coordinate.user_id)
            .await
            .map_err(map_repository_error)?;
        let items = self
            .repos
            .items
            .find_by_coordinate(id)
            .await
            .map_err(map_repository_error)?;
        let like_count = self
            .repos
            .likes
            .count_by_coordinate(id)
            .await
            .map_err(map_repository_error)?;
        let comment_count = self
            .repos
            .comments
            .count_by_coordinate(id)
            .await
            .map_err(map_repository_error)?;
        let is_liked = match viewer {
            Some(viewer) => self
                .repos
                .likes
                .find(viewer, id)
                .await
                .map_err(map_repository_error)?
                .is_some(),
            None => false,
        };
        Ok(CoordinateDetails {
            coordinate,
            owner,
            items,
            like_count,
            comment_count,
            is_liked,
        })
    }

    async fn decorate_all(
        &self,
        coordinates: Vec<Coordinate>,
        viewer: Option<UserId>,
    ) -> Result<Vec<CoordinateDetails>, Error> {
        let mut details = Vec::with_capacity(coordinates.len());
        for coordinate in coordinates {
            details.push(self.decorate(coordinate, viewer).await?);
        }
        Ok(details)
    }

    async fn decorate_page(
        &self,
        page: Page<Coordinate>,
        request: PageRequest,
        viewer: Option<UserId>,
    ) -> Result<Page<CoordinateDetails>, Error> {
        let total = page.total_count();
        let details = self.decorate_all(page.into_items(), viewer).await?;
        Ok(Page::new(details, total, request))
    }
}

#[async_trait]
impl CoordinateService for CoordinateServiceImpl {
    async fn create_coordinate(
        &self,
        mut coordinate: NewCoordinate,
        item_ids: Vec<ItemId>,
        picture: Option<ImageUpload>,
    ) -> Result<CoordinateDetails, Error> {
        let owner = coordinate.user_id;
        let item_ids = self.check_items(owner, &item_ids).await?;
        let stored = store_picture(
            self.repos.images.as_ref(),
            ImageFolder::Coordinates,
            picture.as_ref(),
        )?;
        if stored.is_some() {
            coordinate.picture.clone_from(&stored);
        }
        let created = match self
            .repos
            .coordinates
            .create_with_items(&coordinate, &item_ids)
            .await
        {
            Ok(created) => created,
            Err(error) => {
                discard_picture(self.repos.images.as_ref(), stored.as_deref());
                return Err(map_repository_error(error));
            }
        };
        debug!(coordinate_id = %created.id, items = item_ids.len(), "coordinate created");
        self.decorate(created, Some(owner)).await
    }

    async fn get_coordinate(
        &self,
        id: CoordinateId,
        viewer: Option<UserId>,
    ) -> Result<CoordinateDetails, Error> {
        let coordinate = self.require_coordinate(id).await?;
        self.decorate(coordinate, viewer).await
    }

    async fn update_coordinate(
        &self,
        user_id: UserId,
        id: CoordinateId,
        mut update: CoordinateUpdate,
        item_ids: Option<Vec<ItemId>>,
        picture: Option<ImageUpload>,
    ) -> Result<CoordinateDetails, Error> {
        let current = self.owned_coordinate(user_id, id).await?;
        let relinked = match item_ids.filter(|ids| !ids.is_empty()) {
            Some(ids) => Some(self.check_items(user_id, &ids).await?),
            None => None,
        };
        let stored = store_picture(
            self.repos.images.as_ref(),
            ImageFolder::Coordinates,
            picture.as_ref(),
        )?;
        if stored.is_some() {
            update.picture.clone_from(&stored);
        }
        let updated = match self
            .repos
            .coordinates
            .update_with_items(id, &update, relinked)
            .await
        {
            Ok(Some(updated)) => updated,
            Ok(None) => {
                discard_picture(self.repos.images.as_ref(), stored.as_deref());
                return Err(Error::not_found(format!("coordinate {id} not found")));
            }
            Err(error) => {
                discard_picture(self.repos.images.as_ref(), stored.as_deref());
                return Err(map_repository_error(error));
            }
        };
        if stored.is_some() {
            discard_picture(self.repos.images.as_ref(), current.picture.as_deref());
        }
        self.decorate(updated, Some(user_id)).await
    }

    async fn delete_coordinate(&self, user_id: UserId, id: CoordinateId) -> Result<(), Error> {
        let coordinate = self.owned_coordinate(user_id, id).await?;
        let removed = self
            .repos
            .coordinates
            .delete(id)
            .await
            .map_err(map_repository_error)?;
        if !removed {
            return Err(Error::not_found(format!("coordinate {id} not found")));
        }
        discard_picture(self.repos.images.as_ref(), coordinate.picture.as_deref());
        Ok(())
    }

    async fn user_coordinates(
        &self,
        user_id: UserId,
        page: PageRequest,
        viewer: Option<UserId>,
    ) -> Result<Page<CoordinateDetails>, Error> {
        let found = self
            .repos
            .coordinates
            .search(&CoordinateFilter::for_user(user_id), page)
            .await
            .map_err(map_repository_error)?;
        self.decorate_page(found, page, viewer).await
    }

    async fn search_coordinates(
        &self,
        filter: CoordinateFilter,
        page: PageRequest,
        viewer: Option<UserId>,
    ) -> Result<Page<CoordinateDetails>, Error> {
        let found = self
            .repos
            .coordinates
            .search(&filter, page)
            .await
            .map_err(map_repository_error)?;
        self.decorate_page(found, page, viewer).await
    }

    async fn timeline(&self, user_id: UserId) -> Result<Vec<CoordinateDetails>, Error> {
        let followed = self
            .repos
            .relationships
            .all_following(user_id)
            .await
            .map_err(map_repository_error)?;
        let mut entries = Vec::new();
        for user in followed {
            let blocked = self
                .repos
                .blocks
                .exists(user_id, user.id)
                .await
                .map_err(map_repository_error)?;
            if blocked {
                continue;
            }
            let recent = self
                .repos
                .coordinates
                .recent_by_user(user.id, TIMELINE_PER_USER)
                .await
                .map_err(map_repository_error)?;
            entries.extend(self.decorate_all(recent, Some(user_id)).await?);
        }
        Ok(entries)
    }

    async fn statistics(&self, user_id: UserId) -> Result<CoordinateStatistics, Error> {
        let coordinates = self
            .repos
            .coordinates
            .all_by_user(user_id)
            .await
            .map_err(map_repository_error)?;
        let mut entries = Vec::with_capacity(coordinates.len());
        for coordinate in coordinates {
            let likes = self
                .repos
                .likes
                .count_by_coordinate(coordinate.id)
                .await
                .map_err(map_repository_error)?;
            entries.push((coordinate, likes));
        }
        Ok(CoordinateStatistics::from_coordinates(&entries))
    }
}

#[cfg(test)]
#[path = "coordinate_service_tests.rs"]
mod tests;
