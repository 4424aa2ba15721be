//! Port for follow edges.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Relationship, User, UserId};

use super::RepositoryError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RelationshipRepository: Send + Sync {
    /// Insert an edge; an existing edge is [`RepositoryError::Duplicate`].
    async fn create(
        &self,
        follower_id: UserId,
        followed_id: UserId,
    ) -> Result<Relationship, RepositoryError>;

    async fn exists(&self, follower_id: UserId, followed_id: UserId)
    -> Result<bool, RepositoryError>;

    async fn delete(&self, follower_id: UserId, followed_id: UserId)
    -> Result<bool, RepositoryError>;

    /// Users following `user_id`, most recent edge first.
    async fn followers(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> Result<Page<User>, RepositoryError>;

    /// Users `user_id` follows, most recent edge first.
    async fn following(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> Result<Page<User>, RepositoryError>;

    /// Unpaged variant of [`RelationshipRepository::following`].
    async fn all_following(&self, user_id: UserId) -> Result<Vec<User>, RepositoryError>;
}
