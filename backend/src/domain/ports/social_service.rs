//! Driving port for social interactions.
//!
//! Likes, comments, follows, blocks and the notification inbox share one
//! port because their rules consult each other: blocks gate comments and
//! follows, and each of like, comment and follow produces a notification.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{
    Block, CommentBody, CommentId, CommentWithAuthor, CoordinateId, Error, LikeCoordinate,
    NotificationDetails, NotificationFeed, NotificationId, Relationship, User, UserId,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SocialService: Send + Sync {
    async fn like(&self, user_id: UserId, coordinate_id: CoordinateId)
    -> Result<LikeCoordinate, Error>;

    async fn unlike(&self, user_id: UserId, coordinate_id: CoordinateId) -> Result<(), Error>;

    async fn is_liked(&self, user_id: UserId, coordinate_id: CoordinateId) -> Result<bool, Error>;

    async fn like_count(&self, coordinate_id: CoordinateId) -> Result<i64, Error>;

    async fn coordinate_likes(
        &self,
        coordinate_id: CoordinateId,
    ) -> Result<Vec<LikeCoordinate>, Error>;

    async fn create_comment(
        &self,
        user_id: UserId,
        coordinate_id: CoordinateId,
        body: CommentBody,
    ) -> Result<CommentWithAuthor, Error>;

    async fn update_comment(
        &self,
        user_id: UserId,
        comment_id: CommentId,
        body: CommentBody,
    ) -> Result<CommentWithAuthor, Error>;

    async fn delete_comment(&self, user_id: UserId, comment_id: CommentId) -> Result<(), Error>;

    async fn coordinate_comments(
        &self,
        coordinate_id: CoordinateId,
        page: PageRequest,
    ) -> Result<Page<CommentWithAuthor>, Error>;

    async fn follow(&self, follower_id: UserId, followed_id: UserId)
    -> Result<Relationship, Error>;

    async fn unfollow(&self, follower_id: UserId, followed_id: UserId) -> Result<(), Error>;

    async fn followers(&self, user_id: UserId, page: PageRequest) -> Result<Page<User>, Error>;

    async fn following(&self, user_id: UserId, page: PageRequest) -> Result<Page<User>, Error>;

    async fn is_following(&self, follower_id: UserId, followed_id: UserId) -> Result<bool, Error>;

    async fn block(&self, blocker_id: UserId, blocked_id: UserId) -> Result<Block, Error>;

    async fn unblock(&self, blocker_id: UserId, blocked_id: UserId) -> Result<(), Error>;

    async fn blocked_users(&self, blocker_id: UserId) -> Result<Vec<User>, Error>;

    async fn is_blocked(&self, blocker_id: UserId, blocked_id: UserId) -> Result<bool, Error>;

    async fn notifications(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> Result<NotificationFeed, Error>;

    async fn unread_notifications(&self, user_id: UserId)
    -> Result<Vec<NotificationDetails>, Error>;

    async fn unread_notification_count(&self, user_id: UserId) -> Result<i64, Error>;

    async fn mark_as_read(&self, user_id: UserId, id: NotificationId) -> Result<(), Error>;

    async fn mark_all_as_read(&self, user_id: UserId) -> Result<u64, Error>;
}
