//! Driving port for coordinates and the timeline.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{
    CoordinateDetails, CoordinateFilter, CoordinateId, CoordinateStatistics, CoordinateUpdate,
    Error, ItemId, NewCoordinate, UserId,
};

use super::ImageUpload;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CoordinateService: Send + Sync {
    /// Compose a coordinate from the caller's own items.
    async fn create_coordinate(
        &self,
        coordinate: NewCoordinate,
        item_ids: Vec<ItemId>,
        picture: Option<ImageUpload>,
    ) -> Result<CoordinateDetails, Error>;

    /// Decorated coordinate; `is_liked` reflects `viewer` when present.
    async fn get_coordinate(
        &self,
        id: CoordinateId,
        viewer: Option<UserId>,
    ) -> Result<CoordinateDetails, Error>;

    /// Owner-only update. A non-empty `item_ids` replaces the item set.
    async fn update_coordinate(
        &self,
        user_id: UserId,
        id: CoordinateId,
        update: CoordinateUpdate,
        item_ids: Option<Vec<ItemId>>,
        picture: Option<ImageUpload>,
    ) -> Result<CoordinateDetails, Error>;

    async fn delete_coordinate(&self, user_id: UserId, id: CoordinateId) -> Result<(), Error>;

    async fn user_coordinates(
        &self,
        user_id: UserId,
        page: PageRequest,
        viewer: Option<UserId>,
    ) -> Result<Page<CoordinateDetails>, Error>;

    async fn search_coordinates(
        &self,
        filter: CoordinateFilter,
        page: PageRequest,
        viewer: Option<UserId>,
    ) -> Result<Page<CoordinateDetails>, Error>;

    /// Recent coordinates of followed users the caller has not blocked.
    async fn timeline(&self, user_id: UserId) -> Result<Vec<CoordinateDetails>, Error>;

    async fn statistics(&self, user_id: UserId) -> Result<CoordinateStatistics, Error>;
}
