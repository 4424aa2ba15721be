//! Port for account persistence.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{NewUser, User, UserId, UserUpdate};

use super::RepositoryError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert an account. A taken e-mail is reported as
    /// [`RepositoryError::Duplicate`].
    async fn create(&self, user: &NewUser) -> Result<User, RepositoryError>;

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError>;

    /// Look up by normalised e-mail.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;

    /// Accounts, newest first.
    async fn list(&self, page: PageRequest) -> Result<Page<User>, RepositoryError>;

    /// Apply profile changes, returning the updated row or `None` if missing.
    async fn update_profile(
        &self,
        id: UserId,
        update: &UserUpdate,
    ) -> Result<Option<User>, RepositoryError>;

    async fn update_password(
        &self,
        id: UserId,
        password_digest: &str,
    ) -> Result<bool, RepositoryError>;

    /// Delete the account and, by cascade, everything it owns.
    async fn delete(&self, id: UserId) -> Result<bool, RepositoryError>;
}
