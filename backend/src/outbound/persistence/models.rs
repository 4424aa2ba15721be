//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Each read row knows how to convert itself
//! into its domain record; stored attribute codes are re-validated on the way
//! out so a corrupt row surfaces as a query error instead of a panic.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::ports::RepositoryError;
use crate::domain::{
    AttributeCodeError, Block, BlockId, Comment, CommentId, Coordinate, CoordinateId,
    CoordinateUpdate, Item, ItemId, ItemUpdate, LikeCoordinate, LikeId, NewCoordinate, NewItem,
    NewNotification, Notification, NotificationAction, NotificationId, Relationship,
    RelationshipId, SizeInfo, User, UserId, code_or_zero, optional_code,
};

use super::schema::{
    blocks, comments, coordinates, items, like_coordinates, notifications, relationships, users,
};

fn corrupt(error: AttributeCodeError) -> RepositoryError {
    RepositoryError::query(format!("stored row is invalid: {error}"))
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub picture: Option<String>,
    pub admin: bool,
    pub password_digest: String,
    pub activated: bool,
    pub activated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::new(row.id),
            name: row.name,
            email: row.email,
            picture: row.picture,
            admin: row.admin,
            password_digest: row.password_digest,
            activated: row.activated,
            activated_at: row.activated_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password_digest: &'a str,
    pub activated: bool,
    pub activated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserChangeset<'a> {
    pub name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub picture: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ItemRow {
    pub id: i64,
    pub user_id: i64,
    pub coordinate_id: Option<i64>,
    pub super_item: String,
    pub season: i16,
    pub tpo: i16,
    pub color: i16,
    pub content: String,
    pub memo: String,
    pub picture: Option<String>,
    pub rating: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ItemRow {
    pub(crate) fn into_domain(self) -> Result<Item, RepositoryError> {
        Ok(Item {
            id: ItemId::new(self.id),
            user_id: UserId::new(self.user_id),
            coordinate_id: self.coordinate_id.map(CoordinateId::new),
            super_item: self.super_item,
            season: self.season.try_into().map_err(corrupt)?,
            tpo: self.tpo.try_into().map_err(corrupt)?,
            color: self.color.try_into().map_err(corrupt)?,
            content: self.content,
            memo: self.memo,
            picture: self.picture,
            rating: self.rating,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = items)]
pub(crate) struct NewItemRow<'a> {
    pub user_id: i64,
    pub super_item: &'a str,
    pub season: i16,
    pub tpo: i16,
    pub color: i16,
    pub content: &'a str,
    pub memo: &'a str,
    pub picture: Option<&'a str>,
    pub rating: f64,
}

impl<'a> From<&'a NewItem> for NewItemRow<'a> {
    fn from(item: &'a NewItem) -> Self {
        Self {
            user_id: item.user_id.get(),
            super_item: &item.super_item,
            season: item.season.code(),
            tpo: item.tpo.code(),
            color: item.color.code(),
            content: &item.content,
            memo: &item.memo,
            picture: item.picture.as_deref(),
            rating: item.rating,
        }
    }
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = items)]
pub(crate) struct ItemChangeset<'a> {
    pub super_item: Option<&'a str>,
    pub season: Option<i16>,
    pub tpo: Option<i16>,
    pub color: Option<i16>,
    pub content: Option<&'a str>,
    pub memo: Option<&'a str>,
    pub picture: Option<&'a str>,
    pub rating: Option<f64>,
}

impl<'a> From<&'a ItemUpdate> for ItemChangeset<'a> {
    fn from(update: &'a ItemUpdate) -> Self {
        Self {
            super_item: update.super_item.as_deref(),
            season: update.season.map(i16::from),
            tpo: update.tpo.map(i16::from),
            color: update.color.map(i16::from),
            content: update.content.as_deref(),
            memo: update.memo.as_deref(),
            picture: update.picture.as_deref(),
            rating: update.rating,
        }
    }
}

// ---------------------------------------------------------------------------
// Coordinates
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = coordinates)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CoordinateRow {
    pub id: i64,
    pub user_id: i64,
    pub season: i16,
    pub tpo: i16,
    pub picture: Option<String>,
    pub memo: String,
    pub rating: f64,
    pub top_length: i16,
    pub top_sleeve: i16,
    pub bottom_length: i16,
    pub bottom_type: i16,
    pub dress_length: i16,
    pub dress_sleeve: i16,
    pub outer_length: i16,
    pub outer_sleeve: i16,
    pub shoe_size: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CoordinateRow {
    pub(crate) fn into_domain(self) -> Result<Coordinate, RepositoryError> {
        let sizes = SizeInfo {
            top_length: optional_code(self.top_length).map_err(corrupt)?,
            top_sleeve: optional_code(self.top_sleeve).map_err(corrupt)?,
            bottom_length: optional_code(self.bottom_length).map_err(corrupt)?,
            bottom_type: optional_code(self.bottom_type).map_err(corrupt)?,
            dress_length: optional_code(self.dress_length).map_err(corrupt)?,
            dress_sleeve: optional_code(self.dress_sleeve).map_err(corrupt)?,
            outer_length: optional_code(self.outer_length).map_err(corrupt)?,
            outer_sleeve: optional_code(self.outer_sleeve).map_err(corrupt)?,
            shoe_size: (self.shoe_size > 0.0).then_some(self.shoe_size),
        };
        Ok(Coordinate {
            id: CoordinateId::new(self.id),
            user_id: UserId::new(self.user_id),
            season: self.season.try_into().map_err(corrupt)?,
            tpo: self.tpo.try_into().map_err(corrupt)?,
            picture: self.picture,
            memo: self.memo,
            rating: self.rating,
            sizes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = coordinates)]
pub(crate) struct NewCoordinateRow<'a> {
    pub user_id: i64,
    pub season: i16,
    pub tpo: i16,
    pub picture: Option<&'a str>,
    pub memo: &'a str,
    pub rating: f64,
    pub top_length: i16,
    pub top_sleeve: i16,
    pub bottom_length: i16,
    pub bottom_type: i16,
    pub dress_length: i16,
    pub dress_sleeve: i16,
    pub outer_length: i16,
    pub outer_sleeve: i16,
    pub shoe_size: f64,
}

impl<'a> From<&'a NewCoordinate> for NewCoordinateRow<'a> {
    fn from(coordinate: &'a NewCoordinate) -> Self {
        let sizes = &coordinate.sizes;
        Self {
            user_id: coordinate.user_id.get(),
            season: coordinate.season.code(),
            tpo: coordinate.tpo.code(),
            picture: coordinate.picture.as_deref(),
            memo: &coordinate.memo,
            rating: coordinate.rating,
            top_length: code_or_zero(sizes.top_length),
            top_sleeve: code_or_zero(sizes.top_sleeve),
            bottom_length: code_or_zero(sizes.bottom_length),
            bottom_type: code_or_zero(sizes.bottom_type),
            dress_length: code_or_zero(sizes.dress_length),
            dress_sleeve: code_or_zero(sizes.dress_sleeve),
            outer_length: code_or_zero(sizes.outer_length),
            outer_sleeve: code_or_zero(sizes.outer_sleeve),
            shoe_size: sizes.shoe_size.unwrap_or(0.0),
        }
    }
}

/// Partial coordinate update. A provided-but-unset size is written as `0`.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = coordinates)]
pub(crate) struct CoordinateChangeset<'a> {
    pub season: Option<i16>,
    pub tpo: Option<i16>,
    pub picture: Option<&'a str>,
    pub memo: Option<&'a str>,
    pub rating: Option<f64>,
    pub top_length: Option<i16>,
    pub top_sleeve: Option<i16>,
    pub bottom_length: Option<i16>,
    pub bottom_type: Option<i16>,
    pub dress_length: Option<i16>,
    pub dress_sleeve: Option<i16>,
    pub outer_length: Option<i16>,
    pub outer_sleeve: Option<i16>,
    pub shoe_size: Option<f64>,
}

impl<'a> From<&'a CoordinateUpdate> for CoordinateChangeset<'a> {
    fn from(update: &'a CoordinateUpdate) -> Self {
        Self {
            season: update.season.map(i16::from),
            tpo: update.tpo.map(i16::from),
            picture: update.picture.as_deref(),
            memo: update.memo.as_deref(),
            rating: update.rating,
            top_length: update.top_length.map(code_or_zero),
            top_sleeve: update.top_sleeve.map(code_or_zero),
            bottom_length: update.bottom_length.map(code_or_zero),
            bottom_type: update.bottom_type.map(code_or_zero),
            dress_length: update.dress_length.map(code_or_zero),
            dress_sleeve: update.dress_sleeve.map(code_or_zero),
            outer_length: update.outer_length.map(code_or_zero),
            outer_sleeve: update.outer_sleeve.map(code_or_zero),
            shoe_size: update.shoe_size.map(|size| size.unwrap_or(0.0)),
        }
    }
}

// ---------------------------------------------------------------------------
// Comments and likes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CommentRow {
    pub id: i64,
    pub user_id: i64,
    pub coordinate_id: i64,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Self {
            id: CommentId::new(row.id),
            user_id: UserId::new(row.user_id),
            coordinate_id: CoordinateId::new(row.coordinate_id),
            comment: row.comment,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = comments)]
pub(crate) struct NewCommentRow<'a> {
    pub user_id: i64,
    pub coordinate_id: i64,
    pub comment: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = like_coordinates)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct LikeRow {
    pub id: i64,
    pub user_id: i64,
    pub coordinate_id: i64,
    pub created_at: DateTime<Utc>,
}

impl From<LikeRow> for LikeCoordinate {
    fn from(row: LikeRow) -> Self {
        Self {
            id: LikeId::new(row.id),
            user_id: UserId::new(row.user_id),
            coordinate_id: CoordinateId::new(row.coordinate_id),
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = like_coordinates)]
pub(crate) struct NewLikeRow {
    pub user_id: i64,
    pub coordinate_id: i64,
}

// ---------------------------------------------------------------------------
// Relationships and blocks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = relationships)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RelationshipRow {
    pub id: i64,
    pub follower_id: i64,
    pub followed_id: i64,
    pub created_at: DateTime<Utc>,
}

impl From<RelationshipRow> for Relationship {
    fn from(row: RelationshipRow) -> Self {
        Self {
            id: RelationshipId::new(row.id),
            follower_id: UserId::new(row.follower_id),
            followed_id: UserId::new(row.followed_id),
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = relationships)]
pub(crate) struct NewRelationshipRow {
    pub follower_id: i64,
    pub followed_id: i64,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = blocks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BlockRow {
    pub id: i64,
    pub blocker_id: i64,
    pub blocked_id: i64,
    pub created_at: DateTime<Utc>,
}

impl From<BlockRow> for Block {
    fn from(row: BlockRow) -> Self {
        Self {
            id: BlockId::new(row.id),
            blocker_id: UserId::new(row.blocker_id),
            blocked_id: UserId::new(row.blocked_id),
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = blocks)]
pub(crate) struct NewBlockRow {
    pub blocker_id: i64,
    pub blocked_id: i64,
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = notifications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct NotificationRow {
    pub id: i64,
    pub sender_id: i64,
    pub receiver_id: i64,
    pub action: String,
    pub coordinate_id: Option<i64>,
    pub comment_id: Option<i64>,
    pub like_coordinate_id: Option<i64>,
    pub checked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NotificationRow {
    pub(crate) fn into_domain(self) -> Result<Notification, RepositoryError> {
        let action = NotificationAction::parse(&self.action).ok_or_else(|| {
            RepositoryError::query(format!("unknown notification action `{}`", self.action))
        })?;
        Ok(Notification {
            id: NotificationId::new(self.id),
            sender_id: UserId::new(self.sender_id),
            receiver_id: UserId::new(self.receiver_id),
            action,
            coordinate_id: self.coordinate_id.map(CoordinateId::new),
            comment_id: self.comment_id.map(CommentId::new),
            like_coordinate_id: self.like_coordinate_id.map(LikeId::new),
            checked: self.checked,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = notifications)]
pub(crate) struct NewNotificationRow {
    pub sender_id: i64,
    pub receiver_id: i64,
    pub action: &'static str,
    pub coordinate_id: Option<i64>,
    pub comment_id: Option<i64>,
    pub like_coordinate_id: Option<i64>,
}

impl From<&NewNotification> for NewNotificationRow {
    fn from(notification: &NewNotification) -> Self {
        Self {
            sender_id: notification.sender_id.get(),
            receiver_id: notification.receiver_id.get(),
            action: notification.action.as_str(),
            coordinate_id: notification.coordinate_id.map(CoordinateId::get),
            comment_id: notification.comment_id.map(CommentId::get),
            like_coordinate_id: notification.like_coordinate_id.map(LikeId::get),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    fn item_row(color: i16) -> ItemRow {
        ItemRow {
            id: 1,
            user_id: 2,
            coordinate_id: None,
            super_item: "tops".into(),
            season: 1,
            tpo: 1,
            color,
            content: String::new(),
            memo: String::new(),
            picture: None,
            rating: 0.0,
            created_at: at(),
            updated_at: at(),
        }
    }

    #[rstest]
    fn item_rows_with_unknown_codes_are_query_errors() {
        let err = item_row(99).into_domain().expect_err("unknown colour");
        assert!(matches!(err, RepositoryError::Query { .. }));
        assert!(item_row(1).into_domain().is_ok());
    }

    #[rstest]
    fn zero_sizes_decode_as_unset() {
        let row = CoordinateRow {
            id: 4,
            user_id: 2,
            season: 2,
            tpo: 3,
            picture: None,
            memo: String::new(),
            rating: 0.0,
            top_length: 0,
            top_sleeve: 1,
            bottom_length: 0,
            bottom_type: 0,
            dress_length: 0,
            dress_sleeve: 0,
            outer_length: 0,
            outer_sleeve: 0,
            shoe_size: 0.0,
            created_at: at(),
            updated_at: at(),
        };
        let coordinate = row.into_domain().expect("valid row");
        assert_eq!(coordinate.sizes.top_length, None);
        assert!(coordinate.sizes.top_sleeve.is_some());
        assert_eq!(coordinate.sizes.shoe_size, None);
    }

    #[rstest]
    fn cleared_sizes_are_written_as_zero() {
        let update = CoordinateUpdate {
            top_length: Some(None),
            shoe_size: Some(None),
            ..CoordinateUpdate::default()
        };
        let changeset = CoordinateChangeset::from(&update);
        assert_eq!(changeset.top_length, Some(0));
        assert_eq!(changeset.shoe_size, Some(0.0));
        assert_eq!(changeset.top_sleeve, None);
    }

    #[rstest]
    fn unknown_notification_action_is_rejected() {
        let row = NotificationRow {
            id: 1,
            sender_id: 1,
            receiver_id: 2,
            action: "poke".into(),
            coordinate_id: None,
            comment_id: None,
            like_coordinate_id: None,
            checked: false,
            created_at: at(),
            updated_at: at(),
        };
        assert!(row.into_domain().is_err());
    }
}
