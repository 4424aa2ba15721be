//! Social graph records: comments, likes, follows, blocks and notifications.

use chrono::{DateTime, Utc};
use pagination::Page;
use thiserror::Error;

use super::{
    BlockId, CommentId, CoordinateId, LikeId, NotificationId, RelationshipId, User, UserId,
};

/// Longest accepted comment body.
pub const COMMENT_MAX: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommentValidationError {
    #[error("comment must not be empty")]
    Empty,
    #[error("comment must be at most {max} characters")]
    TooLong { max: usize },
}

/// Validated comment text.
///
/// # Examples
/// ```
/// use speadwear::domain::CommentBody;
///
/// assert!(CommentBody::new("").is_err());
/// assert_eq!(CommentBody::new("love the scarf").expect("valid").as_str(), "love the scarf");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentBody(String);

impl CommentBody {
    pub fn new(raw: impl Into<String>) -> Result<Self, CommentValidationError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(CommentValidationError::Empty);
        }
        if raw.chars().count() > COMMENT_MAX {
            return Err(CommentValidationError::TooLong { max: COMMENT_MAX });
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: CommentId,
    pub user_id: UserId,
    pub coordinate_id: CoordinateId,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub user_id: UserId,
    pub coordinate_id: CoordinateId,
    pub body: CommentBody,
}

/// Comment listed together with its author.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentWithAuthor {
    pub comment: Comment,
    pub author: Option<User>,
}

/// A user's like of a coordinate; unique per pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikeCoordinate {
    pub id: LikeId,
    pub user_id: UserId,
    pub coordinate_id: CoordinateId,
    pub created_at: DateTime<Utc>,
}

/// Directed follow edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: RelationshipId,
    pub follower_id: UserId,
    pub followed_id: UserId,
    pub created_at: DateTime<Utc>,
}

/// Directed block edge. Independent of any follow edge between the pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub id: BlockId,
    pub blocker_id: UserId,
    pub blocked_id: UserId,
    pub created_at: DateTime<Utc>,
}

/// Social event recorded for its receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationAction {
    Follow,
    Like,
    Comment,
}

impl NotificationAction {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Follow => "follow",
            Self::Like => "like",
            Self::Comment => "comment",
        }
    }

    /// Parse the stored action label.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "follow" => Some(Self::Follow),
            "like" => Some(Self::Like),
            "comment" => Some(Self::Comment),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub action: NotificationAction,
    pub coordinate_id: Option<CoordinateId>,
    pub comment_id: Option<CommentId>,
    pub like_coordinate_id: Option<LikeId>,
    pub checked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Notification to insert. Built through the constructors so each action
/// carries the references it needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub action: NotificationAction,
    pub coordinate_id: Option<CoordinateId>,
    pub comment_id: Option<CommentId>,
    pub like_coordinate_id: Option<LikeId>,
}

impl NewNotification {
    pub fn follow(sender_id: UserId, receiver_id: UserId) -> Self {
        Self {
            sender_id,
            receiver_id,
            action: NotificationAction::Follow,
            coordinate_id: None,
            comment_id: None,
            like_coordinate_id: None,
        }
    }

    pub fn like(like: &LikeCoordinate, receiver_id: UserId) -> Self {
        Self {
            sender_id: like.user_id,
            receiver_id,
            action: NotificationAction::Like,
            coordinate_id: Some(like.coordinate_id),
            comment_id: None,
            like_coordinate_id: Some(like.id),
        }
    }

    pub fn comment(comment: &Comment, receiver_id: UserId) -> Self {
        Self {
            sender_id: comment.user_id,
            receiver_id,
            action: NotificationAction::Comment,
            coordinate_id: Some(comment.coordinate_id),
            comment_id: Some(comment.id),
            like_coordinate_id: None,
        }
    }

    /// Self-triggered events are never recorded.
    pub fn is_self_directed(&self) -> bool {
        self.sender_id == self.receiver_id
    }
}

/// Notification listed with its sender.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationDetails {
    pub notification: Notification,
    pub sender: Option<User>,
}

/// Paged notification listing plus the receiver's unread total.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationFeed {
    pub page: Page<NotificationDetails>,
    pub unread_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    #[rstest]
    #[case("   ", CommentValidationError::Empty)]
    #[case("", CommentValidationError::Empty)]
    fn blank_comments_are_rejected(#[case] raw: &str, #[case] expected: CommentValidationError) {
        assert_eq!(CommentBody::new(raw), Err(expected));
    }

    #[rstest]
    fn comment_length_is_counted_in_characters() {
        assert!(CommentBody::new("あ".repeat(COMMENT_MAX)).is_ok());
        assert_eq!(
            CommentBody::new("a".repeat(COMMENT_MAX + 1)),
            Err(CommentValidationError::TooLong { max: COMMENT_MAX })
        );
    }

    #[rstest]
    #[case(NotificationAction::Follow)]
    #[case(NotificationAction::Like)]
    #[case(NotificationAction::Comment)]
    fn actions_parse_their_labels(#[case] action: NotificationAction) {
        assert_eq!(NotificationAction::parse(action.as_str()), Some(action));
    }

    #[rstest]
    fn like_notification_references_like_and_coordinate() {
        let like = LikeCoordinate {
            id: LikeId::new(9),
            user_id: UserId::new(2),
            coordinate_id: CoordinateId::new(5),
            created_at: Utc
                .with_ymd_and_hms(2026, 5, 5, 5, 5, 5)
                .single()
                .expect("valid timestamp"),
        };
        let notification = NewNotification::like(&like, UserId::new(1));
        assert_eq!(notification.action, NotificationAction::Like);
        assert_eq!(notification.coordinate_id, Some(CoordinateId::new(5)));
        assert_eq!(notification.like_coordinate_id, Some(LikeId::new(9)));
        assert!(!notification.is_self_directed());
    }
}
