//! `UserRepository` over the in-memory tables.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::ports::{RepositoryError, UserRepository};
use crate::domain::{NewUser, User, UserId, UserUpdate};

use super::{InMemoryStore, Tables, newest_first};

const EMAIL_KEY: &str = "users_email_key";

fn email_taken(tables: &Tables, email: &str, except: Option<UserId>) -> bool {
    tables
        .users
        .values()
        .any(|user| user.email == email && Some(user.id) != except)
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: &NewUser) -> Result<User, RepositoryError> {
        let now = self.now();
        let mut tables = self.tables()?;
        if email_taken(&tables, user.email.as_str(), None) {
            return Err(RepositoryError::duplicate(EMAIL_KEY));
        }
        let id = tables.allocate_id();
        let row = User {
            id: UserId::new(id),
            name: user.name.as_str().to_owned(),
            email: user.email.as_str().to_owned(),
            picture: None,
            admin: false,
            password_digest: user.password_digest.clone(),
            activated: user.activated_at.is_some(),
            activated_at: user.activated_at,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(id, row.clone());
        Ok(row)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.tables()?.users.get(&id.get()).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .tables()?
            .users
            .values()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn list(&self, page: PageRequest) -> Result<Page<User>, RepositoryError> {
        let mut rows: Vec<User> = self.tables()?.users.values().cloned().collect();
        newest_first(&mut rows, |user| (user.created_at, user.id.get()));
        let total = i64::try_from(rows.len()).unwrap_or(i64::MAX);
        Ok(Page::new(page.slice(&rows), total, page))
    }

    async fn update_profile(
        &self,
        id: UserId,
        update: &UserUpdate,
    ) -> Result<Option<User>, RepositoryError> {
        let now = self.now();
        let mut tables = self.tables()?;
        if let Some(email) = &update.email {
            if email_taken(&tables, email.as_str(), Some(id)) {
                return Err(RepositoryError::duplicate(EMAIL_KEY));
            }
        }
        let Some(user) = tables.users.get_mut(&id.get()) else {
            return Ok(None);
        };
        if let Some(name) = &update.name {
            user.name = name.as_str().to_owned();
        }
        if let Some(email) = &update.email {
            user.email = email.as_str().to_owned();
        }
        if let Some(picture) = &update.picture {
            user.picture = Some(picture.clone());
        }
        user.updated_at = now;
        Ok(Some(user.clone()))
    }

    async fn update_password(
        &self,
        id: UserId,
        password_digest: &str,
    ) -> Result<bool, RepositoryError> {
        let now = self.now();
        let mut tables = self.tables()?;
        let Some(user) = tables.users.get_mut(&id.get()) else {
            return Ok(false);
        };
        password_digest.clone_into(&mut user.password_digest);
        user.updated_at = now;
        Ok(true)
    }

    async fn delete(&self, id: UserId) -> Result<bool, RepositoryError> {
        let mut tables = self.tables()?;
        if tables.users.remove(&id.get()).is_none() {
            return Ok(false);
        }
        let owned: Vec<i64> = tables
            .coordinates
            .values()
            .filter(|coordinate| coordinate.user_id == id)
            .map(|coordinate| coordinate.id.get())
            .collect();
        for coordinate_id in owned {
            tables.drop_coordinate(coordinate_id);
        }
        tables.items.retain(|_, item| item.user_id != id);
        let comments: Vec<i64> = tables
            .comments
            .values()
            .filter(|comment| comment.user_id == id)
            .map(|comment| comment.id.get())
            .collect();
        for comment_id in comments {
            tables.drop_comment(comment_id);
        }
        let likes: Vec<i64> = tables
            .likes
            .values()
            .filter(|like| like.user_id == id)
            .map(|like| like.id.get())
            .collect();
        for like_id in likes {
            tables.drop_like(like_id);
        }
        tables
            .relationships
            .retain(|_, edge| edge.follower_id != id && edge.followed_id != id);
        tables
            .blocks
            .retain(|_, edge| edge.blocker_id != id && edge.blocked_id != id);
        tables
            .notifications
            .retain(|_, row| row.sender_id != id && row.receiver_id != id);
        Ok(true)
    }
}
