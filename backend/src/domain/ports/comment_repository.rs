//! Port for comment persistence.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Comment, CommentBody, CommentId, CoordinateId, NewComment};

use super::RepositoryError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn create(&self, comment: &NewComment) -> Result<Comment, RepositoryError>;

    async fn find_by_id(&self, id: CommentId) -> Result<Option<Comment>, RepositoryError>;

    async fn update_body(
        &self,
        id: CommentId,
        body: &CommentBody,
    ) -> Result<Option<Comment>, RepositoryError>;

    async fn delete(&self, id: CommentId) -> Result<bool, RepositoryError>;

    /// Comments on a coordinate, newest first.
    async fn list_by_coordinate(
        &self,
        coordinate_id: CoordinateId,
        page: PageRequest,
    ) -> Result<Page<Comment>, RepositoryError>;

    async fn count_by_coordinate(&self, coordinate_id: CoordinateId)
    -> Result<i64, RepositoryError>;
}
