//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Each repository port has one `Diesel*Repository` implementation sharing a
//! `bb8` pool through `diesel-async`.
//!
//! - Row structs (`models.rs`) and `table!` definitions (`schema.rs`) stay
//!   private to this module; adapters hand domain types back to callers.
//! - Database failures are folded into [`RepositoryError`] by
//!   `diesel_basic_error_mapping`, with unique violations carrying the
//!   constraint name.
//!
//! # Example
//!
//! ```ignore
//! use speadwear::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/speadwear")).await?;
//! let users = DieselUserRepository::new(pool);
//! ```
//!
//! [`RepositoryError`]: crate::domain::ports::RepositoryError

mod diesel_basic_error_mapping;
mod diesel_block_repository;
mod diesel_comment_repository;
mod diesel_coordinate_repository;
mod diesel_item_repository;
mod diesel_like_repository;
mod diesel_notification_repository;
mod diesel_relationship_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_block_repository::DieselBlockRepository;
pub use diesel_comment_repository::DieselCommentRepository;
pub use diesel_coordinate_repository::DieselCoordinateRepository;
pub use diesel_item_repository::DieselItemRepository;
pub use diesel_like_repository::DieselLikeRepository;
pub use diesel_notification_repository::DieselNotificationRepository;
pub use diesel_relationship_repository::DieselRelationshipRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
