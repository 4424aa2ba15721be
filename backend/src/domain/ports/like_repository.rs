//! Port for coordinate likes.

use async_trait::async_trait;

use crate::domain::{CoordinateId, LikeCoordinate, UserId};

use super::RepositoryError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LikeRepository: Send + Sync {
    /// Insert a like. A second like for the same pair is reported as
    /// [`RepositoryError::Duplicate`].
    async fn create(
        &self,
        user_id: UserId,
        coordinate_id: CoordinateId,
    ) -> Result<LikeCoordinate, RepositoryError>;

    async fn find(
        &self,
        user_id: UserId,
        coordinate_id: CoordinateId,
    ) -> Result<Option<LikeCoordinate>, RepositoryError>;

    async fn delete(
        &self,
        user_id: UserId,
        coordinate_id: CoordinateId,
    ) -> Result<bool, RepositoryError>;

    async fn count_by_coordinate(&self, coordinate_id: CoordinateId)
    -> Result<i64, RepositoryError>;

    /// Likes on a coordinate, newest first.
    async fn list_by_coordinate(
        &self,
        coordinate_id: CoordinateId,
    ) -> Result<Vec<LikeCoordinate>, RepositoryError>;
}
