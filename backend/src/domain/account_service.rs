//! Account and authentication service.
//!
//! Implements [`AccountService`] over the user repository, the password
//! hasher, the token service and the image store.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::{Page, PageRequest};
use tracing::info;

use super::repository_errors::{
    conflict_as, discard_picture, map_credential_error, map_repository_error, store_picture,
};
use super::ports::{
    AccountService, ImageFolder, ImageStore, ImageUpload, PasswordHasher, TokenService,
    UserRepository,
};
use super::{
    AuthSession, Error, LoginCredentials, NewUser, PasswordChange, Registration, User, UserId,
    UserUpdate,
};

const INVALID_LOGIN: &str = "invalid email or password";
const EMAIL_TAKEN: &str = "email already registered";

/// Collaborators of [`AccountServiceImpl`].
#[derive(Clone)]
pub struct AccountDependencies {
    pub users: Arc<dyn UserRepository>,
    pub hasher: Arc<dyn PasswordHasher>,
    pub tokens: Arc<dyn TokenService>,
    pub images: Arc<dyn ImageStore>,
    pub clock: Arc<dyn Clock>,
}

#[derive(Clone)]
pub struct AccountServiceImpl {
    deps: AccountDependencies,
}

impl AccountServiceImpl {
    pub fn new(deps: AccountDependencies) -> Self {
        Self { deps }
    }

    fn session_for(&self, user: User) -> Result<AuthSession, Error> {
        let token = self.deps.tokens.issue(&user).map_err(map_credential_error)?;
        Ok(AuthSession { token, user })
    }

    async fn require_user(&self, id: UserId) -> Result<User, Error> {
        self.deps
            .users
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("user {id} not found")))
    }

    async fn ensure_email_free(&self, owner: UserId, update: &UserUpdate) -> Result<(), Error> {
        let Some(email) = &update.email else {
            return Ok(());
        };
        let existing = self
            .deps
            .users
            .find_by_email(email.as_str())
            .await
            .map_err(map_repository_error)?;
        match existing {
            Some(other) if other.id != owner => Err(Error::conflict(EMAIL_TAKEN)),
            _ => Ok(()),
        }
    }

    async fn apply_update(&self, target: UserId, update: &UserUpdate) -> Result<User, Error> {
        self.ensure_email_free(target, update).await?;
        self.deps
            .users
            .update_profile(target, update)
            .await
            .map_err(conflict_as(EMAIL_TAKEN))?
            .ok_or_else(|| Error::not_found(format!("user {target} not found")))
    }

    async fn authorise_management(&self, requester: UserId, target: UserId) -> Result<User, Error> {
        let acting = self
            .deps
            .users
            .find_by_id(requester)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::unauthorized("authenticated user no longer exists"))?;
        let target = self.require_user(target).await?;
        if !target.can_be_managed_by(&acting) {
            return Err(Error::forbidden("not allowed to manage this user"));
        }
        Ok(target)
    }
}

#[async_trait]
impl AccountService for AccountServiceImpl {
    async fn signup(&self, registration: &Registration) -> Result<AuthSession, Error> {
        let taken = self
            .deps
            .users
            .find_by_email(registration.email().as_str())
            .await
            .map_err(map_repository_error)?;
        if taken.is_some() {
            return Err(Error::conflict(EMAIL_TAKEN));
        }

        let password_digest = self
            .deps
            .hasher
            .hash(registration.password())
            .await
            .map_err(map_credential_error)?;
        let new_user = NewUser {
            name: registration.name().clone(),
            email: registration.email().clone(),
            password_digest,
            activated_at: Some(self.deps.clock.utc()),
        };
        let user = self
            .deps
            .users
            .create(&new_user)
            .await
            .map_err(conflict_as(EMAIL_TAKEN))?;
        info!(user_id = %user.id, "account created");
        self.session_for(user)
    }

    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthSession, Error> {
        let user = self
            .deps
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::unauthorized(INVALID_LOGIN))?;
        if !self
            .deps
            .hasher
            .verify(credentials.password(), &user.password_digest)
            .await
        {
            return Err(Error::unauthorized(INVALID_LOGIN));
        }
        if !user.activated {
            return Err(Error::forbidden("account not activated"));
        }
        self.session_for(user)
    }

    async fn refresh(&self, user_id: UserId) -> Result<AuthSession, Error> {
        let user = self.require_user(user_id).await?;
        self.session_for(user)
    }

    async fn get_user(&self, user_id: UserId) -> Result<User, Error> {
        self.require_user(user_id).await
    }

    async fn list_users(&self, page: PageRequest) -> Result<Page<User>, Error> {
        self.deps
            .users
            .list(page)
            .await
            .map_err(map_repository_error)
    }

    async fn update_profile(
        &self,
        user_id: UserId,
        mut update: UserUpdate,
        picture: Option<ImageUpload>,
    ) -> Result<User, Error> {
        let current = self.require_user(user_id).await?;
        let stored = store_picture(
            self.deps.images.as_ref(),
            ImageFolder::Users,
            picture.as_ref(),
        )?;
        if let Some(path) = &stored {
            update.picture = Some(path.clone());
        }

        match self.apply_update(user_id, &update).await {
            Ok(user) => {
                if stored.is_some() {
                    discard_picture(self.deps.images.as_ref(), current.picture.as_deref());
                }
                Ok(user)
            }
            Err(error) => {
                discard_picture(self.deps.images.as_ref(), stored.as_deref());
                Err(error)
            }
        }
    }

    async fn update_user(
        &self,
        requester: UserId,
        target: UserId,
        update: UserUpdate,
    ) -> Result<User, Error> {
        let target = self.authorise_management(requester, target).await?;
        self.apply_update(target.id, &update).await
    }

    async fn delete_user(&self, requester: UserId, target: UserId) -> Result<(), Error> {
        let target = self.authorise_management(requester, target).await?;
        let removed = self
            .deps
            .users
            .delete(target.id)
            .await
            .map_err(map_repository_error)?;
        if !removed {
            return Err(Error::not_found(format!("user {} not found", target.id)));
        }
        discard_picture(self.deps.images.as_ref(), target.picture.as_deref());
        info!(user_id = %target.id, %requester, "account deleted");
        Ok(())
    }

    async fn change_password(
        &self,
        user_id: UserId,
        change: &PasswordChange,
    ) -> Result<(), Error> {
        let user = self.require_user(user_id).await?;
        if !self
            .deps
            .hasher
            .verify(change.current(), &user.password_digest)
            .await
        {
            return Err(Error::invalid_request("current password is incorrect"));
        }
        let digest = self
            .deps
            .hasher
            .hash(change.replacement())
            .await
            .map_err(map_credential_error)?;
        let updated = self
            .deps
            .users
            .update_password(user_id, &digest)
            .await
            .map_err(map_repository_error)?;
        if !updated {
            return Err(Error::not_found(format!("user {user_id} not found")));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
