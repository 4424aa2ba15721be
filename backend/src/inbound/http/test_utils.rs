//! Test helpers for inbound HTTP components.
//!
//! [`TestBackend`] wires the real services over an [`InMemoryStore`], so
//! handler tests exercise the full request path without a database.

use std::sync::{Arc, Mutex};

use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, test as actix_test, web};
use mockable::DefaultClock;
use serde_json::{Value, json};

use crate::domain::ports::{
    ImageFolder, ImageStore, ImageStoreError, ImageUpload, MockAccountService,
    MockCoordinateService, MockItemService, MockSocialService, TokenService,
};
use crate::domain::{
    AccountDependencies, AccountServiceImpl, CoordinateRepositories, CoordinateServiceImpl,
    ItemServiceImpl, SocialRepositories, SocialServiceImpl, UserId,
};
use crate::inbound::http::configure_api;
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::InMemoryStore;
use crate::outbound::security::{JwtTokenService, Pbkdf2PasswordHasher};

/// Image store that records paths instead of writing files.
#[derive(Default)]
pub struct RecordingImageStore {
    saved: Mutex<Vec<String>>,
    deleted: Mutex<Vec<String>>,
}

impl RecordingImageStore {
    pub fn saved(&self) -> Vec<String> {
        self.saved.lock().map(|paths| paths.clone()).unwrap_or_default()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted
            .lock()
            .map(|paths| paths.clone())
            .unwrap_or_default()
    }
}

impl ImageStore for RecordingImageStore {
    fn save(&self, folder: ImageFolder, upload: &ImageUpload) -> Result<String, ImageStoreError> {
        let mut saved = self
            .saved
            .lock()
            .map_err(|_| ImageStoreError::io("poisoned"))?;
        let path = format!("{}/{}_{}", folder.as_str(), saved.len(), upload.file_name);
        saved.push(path.clone());
        Ok(path)
    }

    fn delete(&self, path: &str) -> Result<(), ImageStoreError> {
        self.deleted
            .lock()
            .map_err(|_| ImageStoreError::io("poisoned"))?
            .push(path.to_owned());
        Ok(())
    }
}

/// Real services over a shared in-memory store.
pub struct TestBackend {
    pub store: InMemoryStore,
    pub images: Arc<RecordingImageStore>,
    pub state: HttpState,
}

impl TestBackend {
    pub fn new() -> Self {
        let clock = Arc::new(DefaultClock);
        let store = InMemoryStore::new(clock.clone());
        let images = Arc::new(RecordingImageStore::default());
        let tokens: Arc<dyn TokenService> =
            Arc::new(JwtTokenService::new(b"test-secret", 1, clock.clone()));
        let shared = Arc::new(store.clone());

        let accounts = AccountServiceImpl::new(AccountDependencies {
            users: shared.clone(),
            hasher: Arc::new(Pbkdf2PasswordHasher::new(1_000)),
            tokens: tokens.clone(),
            images: images.clone(),
            clock,
        });
        let items = ItemServiceImpl::new(shared.clone(), images.clone());
        let coordinates = CoordinateServiceImpl::new(CoordinateRepositories {
            coordinates: shared.clone(),
            items: shared.clone(),
            users: shared.clone(),
            likes: shared.clone(),
            comments: shared.clone(),
            relationships: shared.clone(),
            blocks: shared.clone(),
            images: images.clone(),
        });
        let social = SocialServiceImpl::new(SocialRepositories {
            users: shared.clone(),
            coordinates: shared.clone(),
            likes: shared.clone(),
            comments: shared.clone(),
            relationships: shared.clone(),
            blocks: shared.clone(),
            notifications: shared,
        });

        let state = HttpState {
            accounts: Arc::new(accounts),
            items: Arc::new(items),
            coordinates: Arc::new(coordinates),
            social: Arc::new(social),
            tokens,
        };
        Self {
            store,
            images,
            state,
        }
    }
}

/// State whose services are unconfigured mocks, for extractor tests.
pub fn state_with_tokens(tokens: Arc<dyn TokenService>) -> HttpState {
    HttpState {
        accounts: Arc::new(MockAccountService::new()),
        items: Arc::new(MockItemService::new()),
        coordinates: Arc::new(MockCoordinateService::new()),
        social: Arc::new(MockSocialService::new()),
        tokens,
    }
}

/// Application exposing the full `/api/v1` surface over `state`.
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .service(web::scope("/api/v1").configure(configure_api))
}

pub fn bearer(token: &str) -> (actix_web::http::header::HeaderName, String) {
    (AUTHORIZATION, format!("Bearer {token}"))
}

/// Register `name` through the API and return its token and id.
pub async fn signup(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    name: &str,
) -> (String, UserId) {
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/auth/signup")
        .set_json(json!({
            "name": name,
            "email": format!("{}@example.com", name.to_lowercase()),
            "password": "secret1",
        }))
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(app, request).await;
    let token = body["token"].as_str().expect("token issued").to_owned();
    let id = body["user"]["id"].as_i64().expect("user id");
    (token, UserId::new(id))
}

/// Create an item owned by the bearer of `token` and return its id.
pub async fn create_item(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    token: &str,
    super_item: &str,
) -> i64 {
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/items")
        .insert_header(bearer(token))
        .set_json(json!({
            "super_item": super_item,
            "season": 1,
            "tpo": 2,
            "color": 3,
            "rating": 4.0,
        }))
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(app, request).await;
    body["id"].as_i64().expect("item id")
}

/// Compose a coordinate from `items` and return its id.
pub async fn create_coordinate(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    token: &str,
    items: &[i64],
) -> i64 {
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/coordinates")
        .insert_header(bearer(token))
        .set_json(json!({
            "season": 2,
            "tpo": 2,
            "rating": 3.5,
            "item_ids": items,
        }))
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(app, request).await;
    body["id"].as_i64().expect("coordinate id")
}
