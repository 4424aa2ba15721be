//! Tests for the social service.

use std::sync::Arc;

use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{
    MockBlockRepository, MockCommentRepository, MockCoordinateRepository, MockLikeRepository,
    MockNotificationRepository, MockRelationshipRepository, MockUserRepository, RepositoryError,
};
use crate::domain::test_fixtures::{comment, coordinate, fixed_time, notification, user};
use crate::domain::{BlockId, ErrorCode, LikeId, NotificationAction, RelationshipId};

struct Doubles {
    users: MockUserRepository,
    coordinates: MockCoordinateRepository,
    likes: MockLikeRepository,
    comments: MockCommentRepository,
    relationships: MockRelationshipRepository,
    blocks: MockBlockRepository,
    notifications: MockNotificationRepository,
}

impl Doubles {
    fn build(self) -> SocialServiceImpl {
        SocialServiceImpl::new(SocialRepositories {
            users: Arc::new(self.users),
            coordinates: Arc::new(self.coordinates),
            likes: Arc::new(self.likes),
            comments: Arc::new(self.comments),
            relationships: Arc::new(self.relationships),
            blocks: Arc::new(self.blocks),
            notifications: Arc::new(self.notifications),
        })
    }

    fn users_exist(&mut self) {
        self.users
            .expect_find_by_id()
            .returning(|id| Ok(Some(user(id.get()))));
    }
}

#[fixture]
fn doubles() -> Doubles {
    Doubles {
        users: MockUserRepository::new(),
        coordinates: MockCoordinateRepository::new(),
        likes: MockLikeRepository::new(),
        comments: MockCommentRepository::new(),
        relationships: MockRelationshipRepository::new(),
        blocks: MockBlockRepository::new(),
        notifications: MockNotificationRepository::new(),
    }
}

fn relationship(follower: i64, followed: i64) -> Relationship {
    Relationship {
        id: RelationshipId::new(1),
        follower_id: UserId::new(follower),
        followed_id: UserId::new(followed),
        created_at: fixed_time(),
    }
}

fn like_row(user_id: UserId, coordinate_id: CoordinateId) -> LikeCoordinate {
    LikeCoordinate {
        id: LikeId::new(40),
        user_id,
        coordinate_id,
        created_at: fixed_time(),
    }
}

fn body(text: &str) -> CommentBody {
    CommentBody::new(text).expect("valid comment")
}

#[rstest]
#[tokio::test]
async fn follow_unknown_user_is_not_found_before_self_check(mut doubles: Doubles) {
    doubles.users.expect_find_by_id().return_once(|_| Ok(None));
    doubles.relationships.expect_create().times(0);

    let error = doubles
        .build()
        .follow(UserId::new(1), UserId::new(1))
        .await
        .expect_err("unknown user");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn follow_self_is_invalid_operation(mut doubles: Doubles) {
    doubles.users_exist();

    let error = doubles
        .build()
        .follow(UserId::new(1), UserId::new(1))
        .await
        .expect_err("self follow");
    assert_eq!(error.code(), ErrorCode::InvalidOperation);
    assert_eq!(error.message(), "cannot follow yourself");
}

#[rstest]
#[case(true, false, ErrorCode::Conflict)]
#[case(false, true, ErrorCode::Forbidden)]
#[case(true, true, ErrorCode::Conflict)]
#[tokio::test]
async fn follow_checks_edge_then_block(
    mut doubles: Doubles,
    #[case] following: bool,
    #[case] blocked: bool,
    #[case] expected: ErrorCode,
) {
    doubles.users_exist();
    doubles
        .relationships
        .expect_exists()
        .return_once(move |_, _| Ok(following));
    doubles
        .blocks
        .expect_exists()
        .withf(|blocker, blocked| *blocker == UserId::new(2) && *blocked == UserId::new(1))
        .returning(move |_, _| Ok(blocked));
    doubles.relationships.expect_create().times(0);

    let error = doubles
        .build()
        .follow(UserId::new(1), UserId::new(2))
        .await
        .expect_err("follow rejected");
    assert_eq!(error.code(), expected);
}

#[rstest]
#[tokio::test]
async fn follow_notifies_followed_user(mut doubles: Doubles) {
    doubles.users_exist();
    doubles
        .relationships
        .expect_exists()
        .return_once(|_, _| Ok(false));
    doubles.blocks.expect_exists().return_once(|_, _| Ok(false));
    doubles
        .relationships
        .expect_create()
        .return_once(|follower, followed| Ok(relationship(follower.get(), followed.get())));
    doubles
        .notifications
        .expect_create()
        .withf(|new| {
            new.action == NotificationAction::Follow
                && new.sender_id == UserId::new(1)
                && new.receiver_id == UserId::new(2)
        })
        .times(1)
        .return_once(|_| Ok(notification(1, 1, 2)));

    let edge = doubles
        .build()
        .follow(UserId::new(1), UserId::new(2))
        .await
        .expect("follow succeeds");
    assert_eq!(edge.followed_id, UserId::new(2));
}

#[rstest]
#[tokio::test]
async fn follow_survives_notification_failure(mut doubles: Doubles) {
    doubles.users_exist();
    doubles
        .relationships
        .expect_exists()
        .return_once(|_, _| Ok(false));
    doubles.blocks.expect_exists().return_once(|_, _| Ok(false));
    doubles
        .relationships
        .expect_create()
        .return_once(|_, _| Ok(relationship(1, 2)));
    doubles
        .notifications
        .expect_create()
        .return_once(|_| Err(RepositoryError::query("insert failed")));

    doubles
        .build()
        .follow(UserId::new(1), UserId::new(2))
        .await
        .expect("follow still succeeds");
}

#[rstest]
#[tokio::test]
async fn follow_race_reports_conflict(mut doubles: Doubles) {
    doubles.users_exist();
    doubles
        .relationships
        .expect_exists()
        .return_once(|_, _| Ok(false));
    doubles.blocks.expect_exists().return_once(|_, _| Ok(false));
    doubles
        .relationships
        .expect_create()
        .return_once(|_, _| Err(RepositoryError::duplicate("relationships_pair_key")));
    doubles.notifications.expect_create().times(0);

    let error = doubles
        .build()
        .follow(UserId::new(1), UserId::new(2))
        .await
        .expect_err("lost race");
    assert_eq!(error.code(), ErrorCode::Conflict);
    assert_eq!(error.message(), "already following");
}

#[rstest]
#[tokio::test]
async fn unfollow_without_edge_is_not_found(mut doubles: Doubles) {
    doubles
        .relationships
        .expect_delete()
        .return_once(|_, _| Ok(false));

    let error = doubles
        .build()
        .unfollow(UserId::new(1), UserId::new(2))
        .await
        .expect_err("no edge");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[case(2, false, None)]
#[case(1, false, Some(ErrorCode::InvalidOperation))]
#[case(2, true, Some(ErrorCode::Conflict))]
#[tokio::test]
async fn block_rules(
    mut doubles: Doubles,
    #[case] target: i64,
    #[case] already: bool,
    #[case] expected: Option<ErrorCode>,
) {
    doubles.users_exist();
    doubles
        .blocks
        .expect_exists()
        .returning(move |_, _| Ok(already));
    doubles.blocks.expect_create().returning(|blocker, blocked| {
        Ok(Block {
            id: BlockId::new(1),
            blocker_id: blocker,
            blocked_id: blocked,
            created_at: fixed_time(),
        })
    });
    doubles.relationships.expect_delete().times(0);

    let outcome = doubles
        .build()
        .block(UserId::new(1), UserId::new(target))
        .await;
    assert_eq!(outcome.err().map(|error| error.code()), expected);
}

#[rstest]
#[tokio::test]
async fn like_missing_coordinate_is_not_found(mut doubles: Doubles) {
    doubles
        .coordinates
        .expect_find_by_id()
        .return_once(|_| Ok(None));
    doubles.likes.expect_create().times(0);

    let error = doubles
        .build()
        .like(UserId::new(1), CoordinateId::new(9))
        .await
        .expect_err("missing coordinate");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn like_twice_is_conflict(mut doubles: Doubles) {
    doubles
        .coordinates
        .expect_find_by_id()
        .return_once(|id| Ok(Some(coordinate(id.get(), 2))));
    doubles
        .likes
        .expect_find()
        .return_once(|user_id, cid| Ok(Some(like_row(user_id, cid))));
    doubles.likes.expect_create().times(0);

    let error = doubles
        .build()
        .like(UserId::new(1), CoordinateId::new(9))
        .await
        .expect_err("duplicate like");
    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[rstest]
#[case(2, 1)]
#[case(1, 0)]
#[tokio::test]
async fn like_notifies_owner_unless_self(
    mut doubles: Doubles,
    #[case] owner: i64,
    #[case] notifications: usize,
) {
    doubles
        .coordinates
        .expect_find_by_id()
        .return_once(move |id| Ok(Some(coordinate(id.get(), owner))));
    doubles.likes.expect_find().return_once(|_, _| Ok(None));
    doubles
        .likes
        .expect_create()
        .return_once(|user_id, cid| Ok(like_row(user_id, cid)));
    doubles
        .notifications
        .expect_create()
        .withf(|new| {
            new.action == NotificationAction::Like
                && new.like_coordinate_id == Some(LikeId::new(40))
                && new.coordinate_id == Some(CoordinateId::new(9))
        })
        .times(notifications)
        .returning(|_| Ok(notification(1, 1, 2)));

    doubles
        .build()
        .like(UserId::new(1), CoordinateId::new(9))
        .await
        .expect("like succeeds");
}

#[rstest]
#[tokio::test]
async fn comment_on_blocking_owner_is_forbidden(mut doubles: Doubles) {
    doubles
        .coordinates
        .expect_find_by_id()
        .return_once(|id| Ok(Some(coordinate(id.get(), 2))));
    doubles
        .blocks
        .expect_exists()
        .withf(|blocker, blocked| *blocker == UserId::new(2) && *blocked == UserId::new(1))
        .return_once(|_, _| Ok(true));
    doubles.comments.expect_create().times(0);

    let error = doubles
        .build()
        .create_comment(UserId::new(1), CoordinateId::new(5), body("love it"))
        .await
        .expect_err("blocked");
    assert_eq!(error.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn comment_notifies_owner_and_returns_author(mut doubles: Doubles) {
    doubles.users_exist();
    doubles
        .coordinates
        .expect_find_by_id()
        .return_once(|id| Ok(Some(coordinate(id.get(), 2))));
    doubles.blocks.expect_exists().return_once(|_, _| Ok(false));
    doubles
        .comments
        .expect_create()
        .withf(|new| new.body.as_str() == "love it")
        .return_once(|new| Ok(comment(7, new.user_id.get(), new.coordinate_id.get())));
    doubles
        .notifications
        .expect_create()
        .withf(|new| {
            new.action == NotificationAction::Comment
                && new.comment_id == Some(CommentId::new(7))
                && new.receiver_id == UserId::new(2)
        })
        .times(1)
        .return_once(|_| Ok(notification(1, 1, 2)));

    let created = doubles
        .build()
        .create_comment(UserId::new(1), CoordinateId::new(5), body("love it"))
        .await
        .expect("comment created");
    assert_eq!(created.author.map(|author| author.id), Some(UserId::new(1)));
}

#[rstest]
#[case(None, ErrorCode::NotFound)]
#[case(Some(3), ErrorCode::Forbidden)]
#[tokio::test]
async fn comment_edits_require_author(
    mut doubles: Doubles,
    #[case] author: Option<i64>,
    #[case] expected: ErrorCode,
) {
    doubles
        .comments
        .expect_find_by_id()
        .returning(move |id| Ok(author.map(|author| comment(id.get(), author, 5))));
    doubles.comments.expect_update_body().times(0);
    doubles.comments.expect_delete().times(0);
    let service = doubles.build();

    let update = service
        .update_comment(UserId::new(1), CommentId::new(7), body("edited"))
        .await
        .expect_err("update rejected");
    let delete = service
        .delete_comment(UserId::new(1), CommentId::new(7))
        .await
        .expect_err("delete rejected");
    assert_eq!(update.code(), expected);
    assert_eq!(delete.code(), expected);
}

#[rstest]
#[tokio::test]
async fn feed_reports_true_total_and_unread(mut doubles: Doubles) {
    doubles.users_exist();
    doubles
        .notifications
        .expect_list_by_receiver()
        .return_once(|_, page| Ok(Page::new(vec![notification(1, 3, 2)], 12, page)));
    doubles
        .notifications
        .expect_count_unread()
        .return_once(|_| Ok(4));

    let feed = doubles
        .build()
        .notifications(UserId::new(2), PageRequest::default())
        .await
        .expect("feed");
    assert_eq!(feed.page.total_count(), 12);
    assert_eq!(feed.unread_count, 4);
    let sender = feed.page.items()[0].sender.as_ref().map(|sender| sender.id);
    assert_eq!(sender, Some(UserId::new(3)));
}

#[rstest]
#[case(None, ErrorCode::NotFound)]
#[case(Some(9), ErrorCode::Forbidden)]
#[tokio::test]
async fn mark_as_read_checks_receiver(
    mut doubles: Doubles,
    #[case] receiver: Option<i64>,
    #[case] expected: ErrorCode,
) {
    doubles
        .notifications
        .expect_find_by_id()
        .return_once(move |id| Ok(receiver.map(|receiver| notification(id.get(), 1, receiver))));
    doubles.notifications.expect_mark_read().times(0);

    let error = doubles
        .build()
        .mark_as_read(UserId::new(2), NotificationId::new(4))
        .await
        .expect_err("rejected");
    assert_eq!(error.code(), expected);
}

#[rstest]
#[tokio::test]
async fn mark_as_read_sets_checked(mut doubles: Doubles) {
    doubles
        .notifications
        .expect_find_by_id()
        .return_once(|id| Ok(Some(notification(id.get(), 1, 2))));
    doubles
        .notifications
        .expect_mark_read()
        .times(1)
        .return_once(|_| Ok(true));

    doubles
        .build()
        .mark_as_read(UserId::new(2), NotificationId::new(4))
        .await
        .expect("marked");
}
