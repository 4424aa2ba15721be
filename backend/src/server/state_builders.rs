//! Builders wiring repositories and adapters into [`HttpState`].

use std::sync::Arc;

use mockable::{Clock, DefaultClock};

use speadwear::domain::ports::{
    BlockRepository, CommentRepository, CoordinateRepository, ImageStore, ItemRepository,
    LikeRepository, NotificationRepository, RelationshipRepository, TokenService, UserRepository,
};
use speadwear::domain::{
    AccountDependencies, AccountServiceImpl, CoordinateRepositories, CoordinateServiceImpl,
    ItemServiceImpl, SocialRepositories, SocialServiceImpl,
};
use speadwear::inbound::http::state::HttpState;
use speadwear::outbound::memory::InMemoryStore;
use speadwear::outbound::persistence::{
    DbPool, DieselBlockRepository, DieselCommentRepository, DieselCoordinateRepository,
    DieselItemRepository, DieselLikeRepository, DieselNotificationRepository,
    DieselRelationshipRepository, DieselUserRepository,
};
use speadwear::outbound::security::{DEFAULT_ITERATIONS, JwtTokenService, Pbkdf2PasswordHasher};
use speadwear::outbound::storage::FsImageStore;

use super::ServerConfig;

/// One handle per repository port.
#[derive(Clone)]
struct Repositories {
    users: Arc<dyn UserRepository>,
    items: Arc<dyn ItemRepository>,
    coordinates: Arc<dyn CoordinateRepository>,
    likes: Arc<dyn LikeRepository>,
    comments: Arc<dyn CommentRepository>,
    relationships: Arc<dyn RelationshipRepository>,
    blocks: Arc<dyn BlockRepository>,
    notifications: Arc<dyn NotificationRepository>,
}

impl Repositories {
    fn diesel(pool: &DbPool) -> Self {
        Self {
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            items: Arc::new(DieselItemRepository::new(pool.clone())),
            coordinates: Arc::new(DieselCoordinateRepository::new(pool.clone())),
            likes: Arc::new(DieselLikeRepository::new(pool.clone())),
            comments: Arc::new(DieselCommentRepository::new(pool.clone())),
            relationships: Arc::new(DieselRelationshipRepository::new(pool.clone())),
            blocks: Arc::new(DieselBlockRepository::new(pool.clone())),
            notifications: Arc::new(DieselNotificationRepository::new(pool.clone())),
        }
    }

    fn in_memory(clock: Arc<dyn Clock>) -> Self {
        let store = Arc::new(InMemoryStore::new(clock));
        Self {
            users: store.clone(),
            items: store.clone(),
            coordinates: store.clone(),
            likes: store.clone(),
            comments: store.clone(),
            relationships: store.clone(),
            blocks: store.clone(),
            notifications: store,
        }
    }
}

/// Build the handler state from `config`.
///
/// # Errors
/// Returns [`std::io::Error`] when the upload directory cannot be opened.
pub(crate) fn build_http_state(config: &ServerConfig) -> std::io::Result<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let repos = match &config.db_pool {
        Some(pool) => Repositories::diesel(pool),
        None => Repositories::in_memory(clock.clone()),
    };

    let images: Arc<dyn ImageStore> = Arc::new(
        FsImageStore::open(&config.upload_path, config.max_upload_bytes, clock.clone()).map_err(
            |err| {
                std::io::Error::other(format!(
                    "failed to open upload directory {}: {err}",
                    config.upload_path.display()
                ))
            },
        )?,
    );
    let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(
        &config.jwt_secret,
        config.jwt_ttl_hours,
        clock.clone(),
    ));

    let accounts = AccountServiceImpl::new(AccountDependencies {
        users: repos.users.clone(),
        hasher: Arc::new(Pbkdf2PasswordHasher::new(DEFAULT_ITERATIONS)),
        tokens: tokens.clone(),
        images: images.clone(),
        clock,
    });
    let items = ItemServiceImpl::new(repos.items.clone(), images.clone());
    let coordinates = CoordinateServiceImpl::new(CoordinateRepositories {
        coordinates: repos.coordinates.clone(),
        items: repos.items.clone(),
        users: repos.users.clone(),
        likes: repos.likes.clone(),
        comments: repos.comments.clone(),
        relationships: repos.relationships.clone(),
        blocks: repos.blocks.clone(),
        images,
    });
    let social = SocialServiceImpl::new(SocialRepositories {
        users: repos.users,
        coordinates: repos.coordinates,
        likes: repos.likes,
        comments: repos.comments,
        relationships: repos.relationships,
        blocks: repos.blocks,
        notifications: repos.notifications,
    });

    Ok(HttpState {
        accounts: Arc::new(accounts),
        items: Arc::new(items),
        coordinates: Arc::new(coordinates),
        social: Arc::new(social),
        tokens,
    })
}
