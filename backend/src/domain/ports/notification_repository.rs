//! Port for notification rows.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{NewNotification, Notification, NotificationId, UserId};

use super::RepositoryError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn create(&self, notification: &NewNotification)
    -> Result<Notification, RepositoryError>;

    async fn find_by_id(&self, id: NotificationId)
    -> Result<Option<Notification>, RepositoryError>;

    /// Receiver's notifications, newest first; the total counts all of them.
    async fn list_by_receiver(
        &self,
        receiver_id: UserId,
        page: PageRequest,
    ) -> Result<Page<Notification>, RepositoryError>;

    /// Unchecked notifications, newest first.
    async fn unread_by_receiver(
        &self,
        receiver_id: UserId,
    ) -> Result<Vec<Notification>, RepositoryError>;

    async fn count_unread(&self, receiver_id: UserId) -> Result<i64, RepositoryError>;

    async fn mark_read(&self, id: NotificationId) -> Result<bool, RepositoryError>;

    /// Mark every unread row of one receiver, returning how many changed.
    async fn mark_all_read(&self, receiver_id: UserId) -> Result<u64, RepositoryError>;
}
