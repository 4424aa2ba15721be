//! Driving port for accounts and authentication.
//!
//! Inbound adapters call this port for signup, login and profile management
//! without importing persistence or token infrastructure.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{
    AuthSession, Error, LoginCredentials, PasswordChange, Registration, User, UserId, UserUpdate,
};

use super::ImageUpload;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Create an activated account and sign it in.
    ///
    /// Fails with [`crate::domain::ErrorCode::Conflict`] when the e-mail is
    /// taken.
    async fn signup(&self, registration: &Registration) -> Result<AuthSession, Error>;

    /// Verify credentials and issue a token.
    ///
    /// Unknown e-mails and wrong passwords both yield
    /// [`crate::domain::ErrorCode::Unauthorized`]; inactive accounts yield
    /// [`crate::domain::ErrorCode::Forbidden`].
    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthSession, Error>;

    /// Issue a fresh token for an existing account.
    async fn refresh(&self, user_id: UserId) -> Result<AuthSession, Error>;

    async fn get_user(&self, user_id: UserId) -> Result<User, Error>;

    async fn list_users(&self, page: PageRequest) -> Result<Page<User>, Error>;

    /// Update the caller's own profile, optionally replacing the picture.
    async fn update_profile(
        &self,
        user_id: UserId,
        update: UserUpdate,
        picture: Option<ImageUpload>,
    ) -> Result<User, Error>;

    /// Update another account; only the owner or an admin may.
    async fn update_user(
        &self,
        requester: UserId,
        target: UserId,
        update: UserUpdate,
    ) -> Result<User, Error>;

    /// Delete an account; only the owner or an admin may.
    async fn delete_user(&self, requester: UserId, target: UserId) -> Result<(), Error>;

    async fn change_password(&self, user_id: UserId, change: &PasswordChange)
    -> Result<(), Error>;
}
