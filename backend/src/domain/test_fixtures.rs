//! Builders shared by domain service tests.

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

use super::{
    Color, Comment, CommentId, Coordinate, CoordinateId, Item, ItemId, Notification,
    NotificationAction, NotificationId, Season, SizeInfo, Tpo, User, UserId,
};

pub(crate) fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 14, 10, 30, 0)
        .single()
        .expect("valid fixture timestamp")
}

/// Clock frozen at [`fixed_time`].
pub(crate) struct FixtureClock;

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        fixed_time().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        fixed_time()
    }
}

pub(crate) fn user(id: i64) -> User {
    User {
        id: UserId::new(id),
        name: format!("user{id}"),
        email: format!("user{id}@example.com"),
        picture: None,
        admin: false,
        password_digest: format!("digest-{id}"),
        activated: true,
        activated_at: Some(fixed_time()),
        created_at: fixed_time(),
        updated_at: fixed_time(),
    }
}

pub(crate) fn item(id: i64, owner: i64) -> Item {
    Item {
        id: ItemId::new(id),
        user_id: UserId::new(owner),
        coordinate_id: None,
        super_item: "tops".into(),
        season: Season::Spring,
        tpo: Tpo::Casual,
        color: Color::Blue,
        content: String::new(),
        memo: String::new(),
        picture: None,
        rating: 3.0,
        created_at: fixed_time(),
        updated_at: fixed_time(),
    }
}

pub(crate) fn coordinate(id: i64, owner: i64) -> Coordinate {
    Coordinate {
        id: CoordinateId::new(id),
        user_id: UserId::new(owner),
        season: Season::Spring,
        tpo: Tpo::Casual,
        picture: None,
        memo: String::new(),
        rating: 4.0,
        sizes: SizeInfo::default(),
        created_at: fixed_time(),
        updated_at: fixed_time(),
    }
}

pub(crate) fn comment(id: i64, author: i64, coordinate_id: i64) -> Comment {
    Comment {
        id: CommentId::new(id),
        user_id: UserId::new(author),
        coordinate_id: CoordinateId::new(coordinate_id),
        comment: "nice".into(),
        created_at: fixed_time(),
        updated_at: fixed_time(),
    }
}

pub(crate) fn notification(id: i64, sender: i64, receiver: i64) -> Notification {
    Notification {
        id: NotificationId::new(id),
        sender_id: UserId::new(sender),
        receiver_id: UserId::new(receiver),
        action: NotificationAction::Follow,
        coordinate_id: None,
        comment_id: None,
        like_coordinate_id: None,
        checked: false,
        created_at: fixed_time(),
        updated_at: fixed_time(),
    }
}
