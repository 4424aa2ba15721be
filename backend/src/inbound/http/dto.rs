//! Response bodies shared across handlers.
//!
//! Domain entities stay free of serde and utoipa derives; these types are the
//! wire representation. Enumerations are emitted as their integer codes and
//! unset sizes as `0`.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use pagination::Page;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    AuthSession, CommentId, CommentWithAuthor, CoordinateDetails, CoordinateId,
    CoordinateStatistics, Item, ItemId, ItemStatistics, LikeId, NotificationDetails,
    NotificationFeed, NotificationId, User, UserId, code_or_zero,
};

/// Public view of an account. The password digest is never serialised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: UserId,
    #[schema(example = "Aiko")]
    pub name: String,
    #[schema(example = "aiko@example.com")]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    pub admin: bool,
    pub activated: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            picture: user.picture,
            admin: user.admin,
            activated: user.activated,
            created_at: user.created_at,
        }
    }
}

/// Token issued by signup, login and refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: UserResponse,
}

impl From<AuthSession> for AuthResponse {
    fn from(session: AuthSession) -> Self {
        Self {
            token: session.token.token,
            expires_at: session.token.expires_at,
            user: session.user.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ItemResponse {
    pub id: ItemId,
    pub user_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinate_id: Option<CoordinateId>,
    #[schema(example = "tops")]
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

impl From<Item> for ItemResponse {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            user_id: item.user_id,
            coordinate_id: item.coordinate_id,
            super_item: item.super_item,
            season: item.season.code(),
            tpo: item.tpo.code(),
            color: item.color.code(),
            content: item.content,
            memo: item.memo,
            picture: item.picture,
            rating: item.rating,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

/// Coordinate with its items, owner and social counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CoordinateResponse {
    pub id: CoordinateId,
    pub user_id: UserId,
    pub season: i16,
    pub tpo: i16,
    pub picture: Option<String>,
    pub si_top_length: i16,
    pub si_top_sleeve: i16,
    pub si_bottom_length: i16,
    pub si_bottom_type: i16,
    pub si_dress_length: i16,
    pub si_dress_sleeve: i16,
    pub si_outer_length: i16,
    pub si_outer_sleeve: i16,
    pub si_shoe_size: f64,
    pub memo: String,
    pub rating: f64,
    pub items: Vec<ItemResponse>,
    pub like_count: i64,
    pub comment_count: i64,
    pub is_liked: bool,
    pub user: Option<UserResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CoordinateDetails> for CoordinateResponse {
    fn from(details: CoordinateDetails) -> Self {
        let CoordinateDetails {
            coordinate,
            owner,
            items,
            like_count,
            comment_count,
            is_liked,
        } = details;
        let sizes = coordinate.sizes;
        Self {
            id: coordinate.id,
            user_id: coordinate.user_id,
            season: coordinate.season.code(),
            tpo: coordinate.tpo.code(),
            picture: coordinate.picture,
            si_top_length: code_or_zero(sizes.top_length),
            si_top_sleeve: code_or_zero(sizes.top_sleeve),
            si_bottom_length: code_or_zero(sizes.bottom_length),
            si_bottom_type: code_or_zero(sizes.bottom_type),
            si_dress_length: code_or_zero(sizes.dress_length),
            si_dress_sleeve: code_or_zero(sizes.dress_sleeve),
            si_outer_length: code_or_zero(sizes.outer_length),
            si_outer_sleeve: code_or_zero(sizes.outer_sleeve),
            si_shoe_size: sizes.shoe_size.unwrap_or_default(),
            memo: coordinate.memo,
            rating: coordinate.rating,
            items: items.into_iter().map(ItemResponse::from).collect(),
            like_count,
            comment_count,
            is_liked,
            user: owner.map(UserResponse::from),
            created_at: coordinate.created_at,
            updated_at: coordinate.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CommentResponse {
    pub id: CommentId,
    pub user_id: UserId,
    pub coordinate_id: CoordinateId,
    pub comment: String,
    pub user: Option<UserResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CommentWithAuthor> for CommentResponse {
    fn from(value: CommentWithAuthor) -> Self {
        let comment = value.comment;
        Self {
            id: comment.id,
            user_id: comment.user_id,
            coordinate_id: comment.coordinate_id,
            comment: comment.comment,
            user: value.author.map(UserResponse::from),
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NotificationResponse {
    pub id: NotificationId,
    pub sender_id: UserId,
    pub receiver_id: UserId,
    /// One of `follow`, `like` or `comment`.
    #[schema(example = "like")]
    pub action: String,
    pub coordinate_id: Option<CoordinateId>,
    pub comment_id: Option<CommentId>,
    pub like_coordinate_id: Option<LikeId>,
    pub checked: bool,
    pub sender: Option<UserResponse>,
    pub created_at: DateTime<Utc>,
}

impl From<NotificationDetails> for NotificationResponse {
    fn from(value: NotificationDetails) -> Self {
        let notification = value.notification;
        Self {
            id: notification.id,
            sender_id: notification.sender_id,
            receiver_id: notification.receiver_id,
            action: notification.action.as_str().to_owned(),
            coordinate_id: notification.coordinate_id,
            comment_id: notification.comment_id,
            like_coordinate_id: notification.like_coordinate_id,
            checked: notification.checked,
            sender: value.sender.map(UserResponse::from),
            created_at: notification.created_at,
        }
    }
}

macro_rules! page_body {
    ($(#[$meta:meta])* $name:ident, $field:ident, $item:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
        pub struct $name {
            pub $field: Vec<$item>,
            pub total_count: i64,
            pub page: u32,
            pub per_page: u32,
        }

        impl<T> From<Page<T>> for $name
        where
            $item: From<T>,
        {
            fn from(page: Page<T>) -> Self {
                let page = page.map(<$item>::from);
                Self {
                    total_count: page.total_count(),
                    page: page.page(),
                    per_page: page.per_page(),
                    $field: page.into_items(),
                }
            }
        }
    };
}

page_body!(
    /// Page of accounts.
    UserPage, users, UserResponse
);
page_body!(ItemPage, items, ItemResponse);
page_body!(CoordinatePage, coordinates, CoordinateResponse);
page_body!(CommentPage, comments, CommentResponse);

/// Notification inbox page with the receiver's unread total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NotificationPage {
    pub notifications: Vec<NotificationResponse>,
    pub total_count: i64,
    pub unread_count: i64,
    pub page: u32,
    pub per_page: u32,
}

impl From<NotificationFeed> for NotificationPage {
    fn from(feed: NotificationFeed) -> Self {
        let page = feed.page.map(NotificationResponse::from);
        Self {
            total_count: page.total_count(),
            unread_count: feed.unread_count,
            page: page.page(),
            per_page: page.per_page(),
            notifications: page.into_items(),
        }
    }
}

/// Unpaged list wrapper, used by the timeline and the block list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CoordinateList {
    pub coordinates: Vec<CoordinateResponse>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserList {
    pub users: Vec<UserResponse>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NotificationList {
    pub notifications: Vec<NotificationResponse>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ItemStatisticsResponse {
    pub total_count: i64,
    /// Item counts keyed by category label.
    pub category_count: BTreeMap<String, i64>,
    /// Item counts keyed by season code.
    pub season_count: BTreeMap<i16, i64>,
    pub tpo_count: BTreeMap<i16, i64>,
    pub color_count: BTreeMap<i16, i64>,
    pub average_rating: f64,
}

impl From<ItemStatistics> for ItemStatisticsResponse {
    fn from(stats: ItemStatistics) -> Self {
        Self {
            total_count: stats.total_count,
            category_count: stats.category_count,
            season_count: stats.season_count,
            tpo_count: stats.tpo_count,
            color_count: stats.color_count,
            average_rating: stats.average_rating,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CoordinateStatisticsResponse {
    pub total_count: i64,
    pub season_count: BTreeMap<i16, i64>,
    pub tpo_count: BTreeMap<i16, i64>,
    pub total_likes: i64,
    pub average_rating: f64,
}

impl From<CoordinateStatistics> for CoordinateStatisticsResponse {
    fn from(stats: CoordinateStatistics) -> Self {
        Self {
            total_count: stats.total_count,
            season_count: stats.season_count,
            tpo_count: stats.tpo_count,
            total_likes: stats.total_likes,
            average_rating: stats.average_rating,
        }
    }
}

/// Like state of a coordinate after a like or unlike.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LikeStatusResponse {
    pub coordinate_id: CoordinateId,
    pub is_liked: bool,
    pub like_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FollowStatusResponse {
    pub is_following: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BlockStatusResponse {
    pub is_blocked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UnreadCountResponse {
    pub unread_count: i64,
}

/// Number of rows touched by a batch operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AffectedResponse {
    pub affected: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "logged out")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Coordinate, Season, SizeInfo, TopLength, Tpo};
    use chrono::TimeZone;
    use pagination::PageRequest;
    use rstest::rstest;
    use serde_json::json;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 4, 1, 9, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    fn user() -> User {
        User {
            id: UserId::new(1),
            name: "Aiko".into(),
            email: "aiko@example.com".into(),
            picture: None,
            admin: false,
            password_digest: "pbkdf2_sha256$1$salt$hash".into(),
            activated: true,
            activated_at: Some(at()),
            created_at: at(),
            updated_at: at(),
        }
    }

    #[rstest]
    fn user_responses_never_carry_the_digest() {
        let value = serde_json::to_value(UserResponse::from(user())).expect("serialises");

        assert!(value.get("password_digest").is_none());
        assert!(value.get("picture").is_none());
        assert_eq!(value["email"], json!("aiko@example.com"));
    }

    #[rstest]
    fn coordinate_sizes_are_flattened_to_codes() {
        let details = CoordinateDetails {
            coordinate: Coordinate {
                id: CoordinateId::new(3),
                user_id: UserId::new(1),
                season: Season::Winter,
                tpo: Tpo::Casual,
                picture: None,
                memo: String::new(),
                rating: 4.0,
                sizes: SizeInfo {
                    top_length: Some(TopLength::Long),
                    shoe_size: Some(24.5),
                    ..SizeInfo::default()
                },
                created_at: at(),
                updated_at: at(),
            },
            owner: Some(user()),
            items: Vec::new(),
            like_count: 2,
            comment_count: 0,
            is_liked: true,
        };

        let value = serde_json::to_value(CoordinateResponse::from(details)).expect("serialises");

        assert_eq!(value["season"], json!(4));
        assert_eq!(value["si_top_length"], json!(3));
        assert_eq!(value["si_bottom_type"], json!(0));
        assert_eq!(value["si_shoe_size"], json!(24.5));
        assert_eq!(value["user"]["name"], json!("Aiko"));
    }

    #[rstest]
    fn pages_keep_paging_metadata() {
        let request = PageRequest::new(2, 1).expect("valid page");
        let body = UserPage::from(Page::new(vec![user()], 3, request));

        assert_eq!(body.users.len(), 1);
        assert_eq!((body.total_count, body.page, body.per_page), (3, 2, 1));
    }
}
