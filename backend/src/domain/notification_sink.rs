//! Best-effort notification recording.
//!
//! Notifications are side effects of likes, comments and follows. The
//! primary write has already committed when the sink runs, so a failure here
//! is logged and dropped rather than surfaced to the caller.

use std::sync::Arc;

use tracing::{debug, warn};

use super::NewNotification;
use super::ports::NotificationRepository;

#[derive(Clone)]
pub(crate) struct NotificationSink {
    notifications: Arc<dyn NotificationRepository>,
}

impl NotificationSink {
    pub(crate) fn new(notifications: Arc<dyn NotificationRepository>) -> Self {
        Self { notifications }
    }

    /// Record `notification` unless it targets its own sender.
    pub(crate) async fn notify(&self, notification: NewNotification) {
        if notification.is_self_directed() {
            debug!(
                action = notification.action.as_str(),
                "skipping self-directed notification"
            );
            return;
        }
        if let Err(error) = self.notifications.create(&notification).await {
            warn!(
                %error,
                action = notification.action.as_str(),
                sender = %notification.sender_id,
                receiver = %notification.receiver_id,
                "failed to record notification"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserId;
    use crate::domain::ports::{MockNotificationRepository, RepositoryError};
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn self_directed_notifications_are_skipped() {
        let mut repo = MockNotificationRepository::new();
        repo.expect_create().times(0);
        let sink = NotificationSink::new(Arc::new(repo));
        sink.notify(NewNotification::follow(UserId::new(1), UserId::new(1)))
            .await;
    }

    #[rstest]
    #[tokio::test]
    async fn failures_are_swallowed() {
        let mut repo = MockNotificationRepository::new();
        repo.expect_create()
            .times(1)
            .return_once(|_| Err(RepositoryError::connection("pool exhausted")));
        let sink = NotificationSink::new(Arc::new(repo));
        sink.notify(NewNotification::follow(UserId::new(1), UserId::new(2)))
            .await;
    }
}
