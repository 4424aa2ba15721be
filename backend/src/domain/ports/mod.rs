//! Domain ports for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`PasswordHasher`], [`TokenService`],
//! [`ImageStore`]) are implemented by outbound adapters. Driving ports
//! ([`AccountService`], [`ItemService`], [`CoordinateService`],
//! [`SocialService`]) are implemented by the domain services and called by
//! inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod account_service;
mod block_repository;
mod comment_repository;
mod coordinate_repository;
mod coordinate_service;
mod credentials;
mod image_store;
mod item_repository;
mod item_service;
mod like_repository;
mod notification_repository;
mod relationship_repository;
mod repository_error;
mod social_service;
mod user_repository;

pub use account_service::AccountService;
#[cfg(test)]
pub use account_service::MockAccountService;
pub use block_repository::BlockRepository;
#[cfg(test)]
pub use block_repository::MockBlockRepository;
pub use comment_repository::CommentRepository;
#[cfg(test)]
pub use comment_repository::MockCommentRepository;
pub use coordinate_repository::CoordinateRepository;
#[cfg(test)]
pub use coordinate_repository::MockCoordinateRepository;
pub use coordinate_service::CoordinateService;
#[cfg(test)]
pub use coordinate_service::MockCoordinateService;
pub use credentials::{CredentialError, PasswordHasher, TokenService};
#[cfg(test)]
pub use credentials::{MockPasswordHasher, MockTokenService};
pub use image_store::{
    ALLOWED_IMAGE_EXTENSIONS, ImageFolder, ImageStore, ImageStoreError, ImageUpload,
};
#[cfg(test)]
pub use image_store::MockImageStore;
pub use item_repository::ItemRepository;
#[cfg(test)]
pub use item_repository::MockItemRepository;
pub use item_service::ItemService;
#[cfg(test)]
pub use item_service::MockItemService;
pub use like_repository::LikeRepository;
#[cfg(test)]
pub use like_repository::MockLikeRepository;
#[cfg(test)]
pub use notification_repository::MockNotificationRepository;
pub use notification_repository::NotificationRepository;
#[cfg(test)]
pub use relationship_repository::MockRelationshipRepository;
pub use relationship_repository::RelationshipRepository;
pub use repository_error::RepositoryError;
#[cfg(test)]
pub use social_service::MockSocialService;
pub use social_service::SocialService;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::UserRepository;
