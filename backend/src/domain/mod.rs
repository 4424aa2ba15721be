//! Domain primitives, entities, ports and services.
//!
//! Purpose: keep business rules independent of HTTP and storage. Entities
//! live in one module per concern; [`ports`] declares the traits adapters
//! implement; the `*_service` modules implement the driving ports on top of
//! the driven ones.
//!
//! Public surface:
//! - [`Error`] / [`ErrorCode`]: transport agnostic failure payload.
//! - [`TraceId`]: request correlation identifier.
//! - Entities: [`User`], [`Item`], [`Coordinate`], [`Comment`],
//!   [`LikeCoordinate`], [`Relationship`], [`Block`], [`Notification`].

pub mod account_service;
pub mod attributes;
pub mod auth;
pub mod coordinate;
pub mod coordinate_service;
pub mod error;
pub mod ids;
pub mod item;
pub mod item_service;
pub mod ports;
pub mod social;
pub mod social_service;
pub mod trace_id;
pub mod user;

mod notification_sink;
mod repository_errors;
#[cfg(test)]
mod test_fixtures;

pub use self::account_service::{AccountDependencies, AccountServiceImpl};
pub use self::attributes::{
    AttributeCodeError, BottomType, Color, Length, OuterLength, OuterSleeve, RATING_RANGE,
    SHOE_SIZE_RANGE, Season, Sleeve, TopLength, Tpo, code_or_zero, optional_code,
};
pub use self::auth::{AuthSession, IssuedToken, LoginCredentials, PasswordChange, Registration};
pub use self::coordinate::{
    Coordinate, CoordinateDetails, CoordinateFilter, CoordinateStatistics, CoordinateUpdate,
    CoordinateValidationError, NewCoordinate, SizeInfo, TIMELINE_PER_USER, validate_item_ids,
    validate_shoe_size,
};
pub use self::coordinate_service::{CoordinateRepositories, CoordinateServiceImpl};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::ids::{
    BlockId, CommentId, CoordinateId, ItemId, LikeId, NotificationId, RelationshipId, UserId,
};
pub use self::item::{
    Item, ItemFilter, ItemStatistics, ItemUpdate, ItemValidationError, NewItem, SUPER_ITEM_MAX,
    validate_rating, validate_super_item,
};
pub use self::item_service::ItemServiceImpl;
pub use self::social::{
    Block, COMMENT_MAX, Comment, CommentBody, CommentValidationError, CommentWithAuthor,
    LikeCoordinate, NewComment, NewNotification, Notification, NotificationAction,
    NotificationDetails, NotificationFeed, Relationship,
};
pub use self::social_service::{SocialRepositories, SocialServiceImpl};
pub use self::trace_id::TraceId;
pub use self::user::{
    EmailAddress, NewUser, PASSWORD_MIN, USER_NAME_MAX, USER_NAME_MIN, User, UserName, UserUpdate,
    UserValidationError, validate_password,
};

/// Convenient result alias for domain operations.
pub type DomainResult<T> = Result<T, Error>;
