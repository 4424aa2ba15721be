//! Port for coordinate persistence.
//!
//! The coordinate row and the `coordinate_id` back-references on its items
//! form one unit: the three mutating methods run inside a single transaction
//! in the database adapter so an item never points at a coordinate that does
//! not list it.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{
    Coordinate, CoordinateFilter, CoordinateId, CoordinateUpdate, ItemId, NewCoordinate, UserId,
};

use super::RepositoryError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CoordinateRepository: Send + Sync {
    /// Insert the coordinate and link `item_ids` to it atomically.
    async fn create_with_items(
        &self,
        coordinate: &NewCoordinate,
        item_ids: &[ItemId],
    ) -> Result<Coordinate, RepositoryError>;

    async fn find_by_id(&self, id: CoordinateId) -> Result<Option<Coordinate>, RepositoryError>;

    /// Update the row and, when `item_ids` is given, replace its item links,
    /// all in one transaction.
    async fn update_with_items(
        &self,
        id: CoordinateId,
        update: &CoordinateUpdate,
        item_ids: Option<Vec<ItemId>>,
    ) -> Result<Option<Coordinate>, RepositoryError>;

    /// Clear item links and delete the row in one transaction.
    async fn delete(&self, id: CoordinateId) -> Result<bool, RepositoryError>;

    /// Filtered page, newest first.
    async fn search(
        &self,
        filter: &CoordinateFilter,
        page: PageRequest,
    ) -> Result<Page<Coordinate>, RepositoryError>;

    /// The `limit` most recent coordinates of one user.
    async fn recent_by_user(
        &self,
        user_id: UserId,
        limit: i64,
    ) -> Result<Vec<Coordinate>, RepositoryError>;

    async fn all_by_user(&self, user_id: UserId) -> Result<Vec<Coordinate>, RepositoryError>;
}
