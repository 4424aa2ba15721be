//! Social service: likes, comments, follows, blocks and the notification
//! inbox.
//!
//! Precondition checks run in a fixed order so callers see the same error
//! for the same state regardless of adapter. Notifications are recorded
//! through [`NotificationSink`] after the primary write and never fail it.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::{Page, PageRequest};
use tracing::info;

use super::notification_sink::NotificationSink;
use super::ports::{
    BlockRepository, CommentRepository, CoordinateRepository, LikeRepository,
    NotificationRepository, RelationshipRepository, SocialService, UserRepository,
};
use super::repository_errors::{conflict_as, map_repository_error};
use super::{
    Block, Comment, CommentBody, CommentId, CommentWithAuthor, Coordinate, CoordinateId, Error,
    LikeCoordinate, NewComment, NewNotification, Notification, NotificationDetails,
    NotificationFeed, NotificationId, Relationship, User, UserId,
};

/// Repositories consulted by [`SocialServiceImpl`].
#[derive(Clone)]
pub struct SocialRepositories {
    pub users: Arc<dyn UserRepository>,
    pub coordinates: Arc<dyn CoordinateRepository>,
    pub likes: Arc<dyn LikeRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub relationships: Arc<dyn RelationshipRepository>,
    pub blocks: Arc<dyn BlockRepository>,
    pub notifications: Arc<dyn NotificationRepository>,
}

#[derive(Clone)]
pub struct SocialServiceImpl {
    repos: SocialRepositories,
    sink: NotificationSink,
}

impl SocialServiceImpl {
    pub fn new(repos: SocialRepositories) -> Self {
        let sink = NotificationSink::new(repos.notifications.clone());
        Self { repos, sink }
    }

    async fn require_user(&self, id: UserId) -> Result<User, Error> {
        self.repos
            .users
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("user {id} not found")))
    }

    async fn require_coordinate(&self, id: CoordinateId) -> Result<Coordinate, Error> {
        self.repos
            .coordinates
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("coordinate {id} not found")))
    }

    async fn owned_comment(&self, user_id: UserId, id: CommentId) -> Result<Comment, Error> {
        let comment = self
            .repos
            .comments
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("comment {id} not found")))?;
        if comment.user_id != user_id {
            return Err(Error::forbidden("comment belongs to another user"));
        }
        Ok(comment)
    }

    async fn blocked(&self, blocker_id: UserId, blocked_id: UserId) -> Result<bool, Error> {
        self.repos
            .blocks
            .exists(blocker_id, blocked_id)
            .await
            .map_err(map_repository_error)
    }

    async fn with_author(&self, comment: Comment) -> Result<CommentWithAuthor, Error> {
        let author = self
            .repos
            .users
            .find_by_id(comment.user_id)
            .await
            .map_err(map_repository_error)?;
        Ok(CommentWithAuthor { comment, author })
    }

    async fn with_sender(
        &self,
        notifications: Vec<Notification>,
    ) -> Result<Vec<NotificationDetails>, Error> {
        let mut details = Vec::with_capacity(notifications.len());
        for notification in notifications {
            let sender = self
                .repos
                .users
                .find_by_id(notification.sender_id)
                .await
                .map_err(map_repository_error)?;
            details.push(NotificationDetails {
                notification,
                sender,
            });
        }
        Ok(details)
    }
}

#[async_trait]
impl SocialService for SocialServiceImpl {
    async fn like(
        &self,
        user_id: UserId,
        coordinate_id: CoordinateId,
    ) -> Result<LikeCoordinate, Error> {
        let coordinate = self.require_coordinate(coordinate_id).await?;
        let existing = self
            .repos
            .likes
            .find(user_id, coordinate_id)
            .await
            .map_err(map_repository_error)?;
        if existing.is_some() {
            return Err(Error::conflict("already liked"));
        }
        let like = self
            .repos
            .likes
            .create(user_id, coordinate_id)
            .await
            .map_err(conflict_as("already liked"))?;
        self.sink
            .notify(NewNotification::like(&like, coordinate.user_id))
            .await;
        Ok(like)
    }

    async fn unlike(&self, user_id: UserId, coordinate_id: CoordinateId) -> Result<(), Error> {
        let removed = self
            .repos
            .likes
            .delete(user_id, coordinate_id)
            .await
            .map_err(map_repository_error)?;
        if !removed {
            return Err(Error::not_found("not liked"));
        }
        Ok(())
    }

    async fn is_liked(&self, user_id: UserId, coordinate_id: CoordinateId) -> Result<bool, Error> {
        let like = self
            .repos
            .likes
            .find(user_id, coordinate_id)
            .await
            .map_err(map_repository_error)?;
        Ok(like.is_some())
    }

    async fn like_count(&self, coordinate_id: CoordinateId) -> Result<i64, Error> {
        self.repos
            .likes
            .count_by_coordinate(coordinate_id)
            .await
            .map_err(map_repository_error)
    }

    async fn coordinate_likes(
        &self,
        coordinate_id: CoordinateId,
    ) -> Result<Vec<LikeCoordinate>, Error> {
        self.repos
            .likes
            .list_by_coordinate(coordinate_id)
            .await
            .map_err(map_repository_error)
    }

    async fn create_comment(
        &self,
        user_id: UserId,
        coordinate_id: CoordinateId,
        body: CommentBody,
    ) -> Result<CommentWithAuthor, Error> {
        let coordinate = self.require_coordinate(coordinate_id).await?;
        if self.blocked(coordinate.user_id, user_id).await? {
            return Err(Error::forbidden("you are blocked by the coordinate owner"));
        }
        let comment = self
            .repos
            .comments
            .create(&NewComment {
                user_id,
                coordinate_id,
                body,
            })
            .await
            .map_err(map_repository_error)?;
        self.sink
            .notify(NewNotification::comment(&comment, coordinate.user_id))
            .await;
        self.with_author(comment).await
    }

    async fn update_comment(
        &self,
        user_id: UserId,
        comment_id: CommentId,
        body: CommentBody,
    ) -> Result<CommentWithAuthor, Error> {
        self.owned_comment(user_id, comment_id).await?;
        let comment = self
            .repos
            .comments
            .update_body(comment_id, &body)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("comment {comment_id} not found")))?;
        self.with_author(comment).await
    }

    async fn delete_comment(&self, user_id: UserId, comment_id: CommentId) -> Result<(), Error> {
        self.owned_comment(user_id, comment_id).await?;
        let removed = self
            .repos
            .comments
            .delete(comment_id)
            .await
            .map_err(map_repository_error)?;
        if !removed {
            return Err(Error::not_found(format!("comment {comment_id} not found")));
        }
        Ok(())
    }

    async fn coordinate_comments(
        &self,
        coordinate_id: CoordinateId,
        page: PageRequest,
    ) -> Result<Page<CommentWithAuthor>, Error> {
        self.require_coordinate(coordinate_id).await?;
        let found = self
            .repos
            .comments
            .list_by_coordinate(coordinate_id, page)
            .await
            .map_err(map_repository_error)?;
        let total = found.total_count();
        let mut comments = Vec::with_capacity(found.items().len());
        for comment in found.into_items() {
            comments.push(self.with_author(comment).await?);
        }
        Ok(Page::new(comments, total, page))
    }

    async fn follow(
        &self,
        follower_id: UserId,
        followed_id: UserId,
    ) -> Result<Relationship, Error> {
        self.require_user(followed_id).await?;
        if follower_id == followed_id {
            return Err(Error::invalid_operation("cannot follow yourself"));
        }
        let exists = self
            .repos
            .relationships
            .exists(follower_id, followed_id)
            .await
            .map_err(map_repository_error)?;
        if exists {
            return Err(Error::conflict("already following"));
        }
        if self.blocked(followed_id, follower_id).await? {
            return Err(Error::forbidden("you are blocked by this user"));
        }
        let relationship = self
            .repos
            .relationships
            .create(follower_id, followed_id)
            .await
            .map_err(conflict_as("already following"))?;
        self.sink
            .notify(NewNotification::follow(follower_id, followed_id))
            .await;
        Ok(relationship)
    }

    async fn unfollow(&self, follower_id: UserId, followed_id: UserId) -> Result<(), Error> {
        let removed = self
            .repos
            .relationships
            .delete(follower_id, followed_id)
            .await
            .map_err(map_repository_error)?;
        if !removed {
            return Err(Error::not_found("not following"));
        }
        Ok(())
    }

    async fn followers(&self, user_id: UserId, page: PageRequest) -> Result<Page<User>, Error> {
        self.repos
            .relationships
            .followers(user_id, page)
            .await
            .map_err(map_repository_error)
    }

    async fn following(&self, user_id: UserId, page: PageRequest) -> Result<Page<User>, Error> {
        self.repos
            .relationships
            .following(user_id, page)
            .await
            .map_err(map_repository_error)
    }

    async fn is_following(&self, follower_id: UserId, followed_id: UserId) -> Result<bool, Error> {
        self.repos
            .relationships
            .exists(follower_id, followed_id)
            .await
            .map_err(map_repository_error)
    }

    async fn block(&self, blocker_id: UserId, blocked_id: UserId) -> Result<Block, Error> {
        self.require_user(blocked_id).await?;
        if blocker_id == blocked_id {
            return Err(Error::invalid_operation("cannot block yourself"));
        }
        if self.blocked(blocker_id, blocked_id).await? {
            return Err(Error::conflict("already blocked"));
        }
        let block = self
            .repos
            .blocks
            .create(blocker_id, blocked_id)
            .await
            .map_err(conflict_as("already blocked"))?;
        info!(blocker = %blocker_id, blocked = %blocked_id, "user blocked");
        Ok(block)
    }

    async fn unblock(&self, blocker_id: UserId, blocked_id: UserId) -> Result<(), Error> {
        let removed = self
            .repos
            .blocks
            .delete(blocker_id, blocked_id)
            .await
            .map_err(map_repository_error)?;
        if !removed {
            return Err(Error::not_found("not blocked"));
        }
        Ok(())
    }

    async fn blocked_users(&self, blocker_id: UserId) -> Result<Vec<User>, Error> {
        self.repos
            .blocks
            .blocked_users(blocker_id)
            .await
            .map_err(map_repository_error)
    }

    async fn is_blocked(&self, blocker_id: UserId, blocked_id: UserId) -> Result<bool, Error> {
        self.blocked(blocker_id, blocked_id).await
    }

    async fn notifications(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> Result<NotificationFeed, Error> {
        let found = self
            .repos
            .notifications
            .list_by_receiver(user_id, page)
            .await
            .map_err(map_repository_error)?;
        let unread_count = self
            .repos
            .notifications
            .count_unread(user_id)
            .await
            .map_err(map_repository_error)?;
        let total = found.total_count();
        let details = self.with_sender(found.into_items()).await?;
        Ok(NotificationFeed {
            page: Page::new(details, total, page),
            unread_count,
        })
    }

    async fn unread_notifications(
        &self,
        user_id: UserId,
    ) -> Result<Vec<NotificationDetails>, Error> {
        let unread = self
            .repos
            .notifications
            .unread_by_receiver(user_id)
            .await
            .map_err(map_repository_error)?;
        self.with_sender(unread).await
    }

    async fn unread_notification_count(&self, user_id: UserId) -> Result<i64, Error> {
        self.repos
            .notifications
            .count_unread(user_id)
            .await
            .map_err(map_repository_error)
    }

    async fn mark_as_read(&self, user_id: UserId, id: NotificationId) -> Result<(), Error> {
        let notification = self
            .repos
            .notifications
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("notification {id} not found")))?;
        if notification.receiver_id != user_id {
            return Err(Error::forbidden("notification belongs to another user"));
        }
        self.repos
            .notifications
            .mark_read(id)
            .await
            .map_err(map_repository_error)?;
        Ok(())
    }

    async fn mark_all_as_read(&self, user_id: UserId) -> Result<u64, Error> {
        self.repos
            .notifications
            .mark_all_read(user_id)
            .await
            .map_err(map_repository_error)
    }
}

#[cfg(test)]
#[path = "social_service_tests.rs"]
mod tests;
