//! Port for block edges.

use async_trait::async_trait;

use crate::domain::{Block, User, UserId};

use super::RepositoryError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlockRepository: Send + Sync {
    /// Insert an edge; an existing edge is [`RepositoryError::Duplicate`].
    async fn create(&self, blocker_id: UserId, blocked_id: UserId)
    -> Result<Block, RepositoryError>;

    async fn exists(&self, blocker_id: UserId, blocked_id: UserId)
    -> Result<bool, RepositoryError>;

    async fn delete(&self, blocker_id: UserId, blocked_id: UserId)
    -> Result<bool, RepositoryError>;

    /// Users blocked by `blocker_id`, most recent edge first.
    async fn blocked_users(&self, blocker_id: UserId) -> Result<Vec<User>, RepositoryError>;
}
