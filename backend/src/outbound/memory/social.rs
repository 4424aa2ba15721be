//! Comment, like, follow, block and notification repositories over the
//! in-memory tables.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagination::{Page, PageRequest};

use crate::domain::ports::{
    BlockRepository, CommentRepository, LikeRepository, NotificationRepository,
    RelationshipRepository, RepositoryError,
};
use crate::domain::{
    Block, BlockId, Comment, CommentBody, CommentId, CoordinateId, LikeCoordinate, LikeId,
    NewComment, NewNotification, Notification, NotificationId, Relationship, RelationshipId, User,
    UserId,
};

use super::{InMemoryStore, Tables, newest_first};

fn count<T>(rows: impl Iterator<Item = T>) -> i64 {
    i64::try_from(rows.count()).unwrap_or(i64::MAX)
}

/// Edge creation time, edge id and the user at the far end.
type Edge = (DateTime<Utc>, i64, UserId);

/// Resolve edge endpoints to users, newest edge first.
fn users_for(tables: &Tables, mut edges: Vec<Edge>) -> Vec<User> {
    edges.sort_by(|left, right| (right.0, right.1).cmp(&(left.0, left.1)));
    edges
        .into_iter()
        .filter_map(|(_, _, user_id)| tables.users.get(&user_id.get()).cloned())
        .collect()
}

fn paged_users(users: Vec<User>, page: PageRequest) -> Page<User> {
    let total = i64::try_from(users.len()).unwrap_or(i64::MAX);
    Page::new(page.slice(&users), total, page)
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn create(&self, comment: &NewComment) -> Result<Comment, RepositoryError> {
        let now = self.now();
        let mut tables = self.tables()?;
        if !tables.coordinates.contains_key(&comment.coordinate_id.get()) {
            return Err(RepositoryError::query("comments_coordinate_id_fkey"));
        }
        let id = tables.allocate_id();
        let row = Comment {
            id: CommentId::new(id),
            user_id: comment.user_id,
            coordinate_id: comment.coordinate_id,
            comment: comment.body.as_str().to_owned(),
            created_at: now,
            updated_at: now,
        };
        tables.comments.insert(id, row.clone());
        Ok(row)
    }

    async fn find_by_id(&self, id: CommentId) -> Result<Option<Comment>, RepositoryError> {
        Ok(self.tables()?.comments.get(&id.get()).cloned())
    }

    async fn update_body(
        &self,
        id: CommentId,
        body: &CommentBody,
    ) -> Result<Option<Comment>, RepositoryError> {
        let now = self.now();
        let mut tables = self.tables()?;
        let Some(comment) = tables.comments.get_mut(&id.get()) else {
            return Ok(None);
        };
        body.as_str().clone_into(&mut comment.comment);
        comment.updated_at = now;
        Ok(Some(comment.clone()))
    }

    async fn delete(&self, id: CommentId) -> Result<bool, RepositoryError> {
        Ok(self.tables()?.drop_comment(id.get()))
    }

    async fn list_by_coordinate(
        &self,
        coordinate_id: CoordinateId,
        page: PageRequest,
    ) -> Result<Page<Comment>, RepositoryError> {
        let mut rows: Vec<Comment> = self
            .tables()?
            .comments
            .values()
            .filter(|comment| comment.coordinate_id == coordinate_id)
            .cloned()
            .collect();
        newest_first(&mut rows, |row| (row.created_at, row.id.get()));
        let total = i64::try_from(rows.len()).unwrap_or(i64::MAX);
        Ok(Page::new(page.slice(&rows), total, page))
    }

    async fn count_by_coordinate(
        &self,
        coordinate_id: CoordinateId,
    ) -> Result<i64, RepositoryError> {
        let tables = self.tables()?;
        Ok(count(
            tables
                .comments
                .values()
                .filter(|comment| comment.coordinate_id == coordinate_id),
        ))
    }
}

#[async_trait]
impl LikeRepository for InMemoryStore {
    async fn create(
        &self,
        user_id: UserId,
        coordinate_id: CoordinateId,
    ) -> Result<LikeCoordinate, RepositoryError> {
        let now = self.now();
        let mut tables = self.tables()?;
        let taken = tables
            .likes
            .values()
            .any(|like| like.user_id == user_id && like.coordinate_id == coordinate_id);
        if taken {
            return Err(RepositoryError::duplicate(
                "like_coordinates_user_coordinate_key",
            ));
        }
        let id = tables.allocate_id();
        let row = LikeCoordinate {
            id: LikeId::new(id),
            user_id,
            coordinate_id,
            created_at: now,
        };
        tables.likes.insert(id, row.clone());
        Ok(row)
    }

    async fn find(
        &self,
        user_id: UserId,
        coordinate_id: CoordinateId,
    ) -> Result<Option<LikeCoordinate>, RepositoryError> {
        Ok(self
            .tables()?
            .likes
            .values()
            .find(|like| like.user_id == user_id && like.coordinate_id == coordinate_id)
            .cloned())
    }

    async fn delete(
        &self,
        user_id: UserId,
        coordinate_id: CoordinateId,
    ) -> Result<bool, RepositoryError> {
        let mut tables = self.tables()?;
        let found = tables
            .likes
            .values()
            .find(|like| like.user_id == user_id && like.coordinate_id == coordinate_id)
            .map(|like| like.id.get());
        Ok(found.is_some_and(|id| tables.drop_like(id)))
    }

    async fn count_by_coordinate(
        &self,
        coordinate_id: CoordinateId,
    ) -> Result<i64, RepositoryError> {
        let tables = self.tables()?;
        Ok(count(
            tables
                .likes
                .values()
                .filter(|like| like.coordinate_id == coordinate_id),
        ))
    }

    async fn list_by_coordinate(
        &self,
        coordinate_id: CoordinateId,
    ) -> Result<Vec<LikeCoordinate>, RepositoryError> {
        let mut rows: Vec<LikeCoordinate> = self
            .tables()?
            .likes
            .values()
            .filter(|like| like.coordinate_id == coordinate_id)
            .cloned()
            .collect();
        newest_first(&mut rows, |row| (row.created_at, row.id.get()));
        Ok(rows)
    }
}

#[async_trait]
impl RelationshipRepository for InMemoryStore {
    async fn create(
        &self,
        follower_id: UserId,
        followed_id: UserId,
    ) -> Result<Relationship, RepositoryError> {
        let now = self.now();
        let mut tables = self.tables()?;
        if follower_id == followed_id {
            return Err(RepositoryError::query("relationships_not_self"));
        }
        let taken = tables
            .relationships
            .values()
            .any(|edge| edge.follower_id == follower_id && edge.followed_id == followed_id);
        if taken {
            return Err(RepositoryError::duplicate("relationships_pair_key"));
        }
        let id = tables.allocate_id();
        let row = Relationship {
            id: RelationshipId::new(id),
            follower_id,
            followed_id,
            created_at: now,
        };
        tables.relationships.insert(id, row.clone());
        Ok(row)
    }

    async fn exists(
        &self,
        follower_id: UserId,
        followed_id: UserId,
    ) -> Result<bool, RepositoryError> {
        Ok(self
            .tables()?
            .relationships
            .values()
            .any(|edge| edge.follower_id == follower_id && edge.followed_id == followed_id))
    }

    async fn delete(
        &self,
        follower_id: UserId,
        followed_id: UserId,
    ) -> Result<bool, RepositoryError> {
        let mut tables = self.tables()?;
        let before = tables.relationships.len();
        tables
            .relationships
            .retain(|_, edge| {
                !(edge.follower_id == follower_id && edge.followed_id == followed_id)
            });
        Ok(tables.relationships.len() < before)
    }

    async fn followers(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> Result<Page<User>, RepositoryError> {
        let tables = self.tables()?;
        let edges = tables
            .relationships
            .values()
            .filter(|edge| edge.followed_id == user_id)
            .map(|edge| (edge.created_at, edge.id.get(), edge.follower_id))
            .collect();
        Ok(paged_users(users_for(&tables, edges), page))
    }

    async fn following(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> Result<Page<User>, RepositoryError> {
        let tables = self.tables()?;
        let edges = tables
            .relationships
            .values()
            .filter(|edge| edge.follower_id == user_id)
            .map(|edge| (edge.created_at, edge.id.get(), edge.followed_id))
            .collect();
        Ok(paged_users(users_for(&tables, edges), page))
    }

    async fn all_following(&self, user_id: UserId) -> Result<Vec<User>, RepositoryError> {
        let tables = self.tables()?;
        let edges = tables
            .relationships
            .values()
            .filter(|edge| edge.follower_id == user_id)
            .map(|edge| (edge.created_at, edge.id.get(), edge.followed_id))
            .collect();
        Ok(users_for(&tables, edges))
    }
}

#[async_trait]
impl BlockRepository for InMemoryStore {
    async fn create(
        &self,
        blocker_id: UserId,
        blocked_id: UserId,
    ) -> Result<Block, RepositoryError> {
        let now = self.now();
        let mut tables = self.tables()?;
        if blocker_id == blocked_id {
            return Err(RepositoryError::query("blocks_not_self"));
        }
        let taken = tables
            .blocks
            .values()
            .any(|edge| edge.blocker_id == blocker_id && edge.blocked_id == blocked_id);
        if taken {
            return Err(RepositoryError::duplicate("blocks_pair_key"));
        }
        let id = tables.allocate_id();
        let row = Block {
            id: BlockId::new(id),
            blocker_id,
            blocked_id,
            created_at: now,
        };
        tables.blocks.insert(id, row.clone());
        Ok(row)
    }

    async fn exists(
        &self,
        blocker_id: UserId,
        blocked_id: UserId,
    ) -> Result<bool, RepositoryError> {
        Ok(self
            .tables()?
            .blocks
            .values()
            .any(|edge| edge.blocker_id == blocker_id && edge.blocked_id == blocked_id))
    }

    async fn delete(
        &self,
        blocker_id: UserId,
        blocked_id: UserId,
    ) -> Result<bool, RepositoryError> {
        let mut tables = self.tables()?;
        let before = tables.blocks.len();
        tables
            .blocks
            .retain(|_, edge| !(edge.blocker_id == blocker_id && edge.blocked_id == blocked_id));
        Ok(tables.blocks.len() < before)
    }

    async fn blocked_users(&self, blocker_id: UserId) -> Result<Vec<User>, RepositoryError> {
        let tables = self.tables()?;
        let edges = tables
            .blocks
            .values()
            .filter(|edge| edge.blocker_id == blocker_id)
            .map(|edge| (edge.created_at, edge.id.get(), edge.blocked_id))
            .collect();
        Ok(users_for(&tables, edges))
    }
}

#[async_trait]
impl NotificationRepository for InMemoryStore {
    async fn create(
        &self,
        notification: &NewNotification,
    ) -> Result<Notification, RepositoryError> {
        let now = self.now();
        let mut tables = self.tables()?;
        let id = tables.allocate_id();
        let row = Notification {
            id: NotificationId::new(id),
            sender_id: notification.sender_id,
            receiver_id: notification.receiver_id,
            action: notification.action,
            coordinate_id: notification.coordinate_id,
            comment_id: notification.comment_id,
            like_coordinate_id: notification.like_coordinate_id,
            checked: false,
            created_at: now,
            updated_at: now,
        };
        tables.notifications.insert(id, row.clone());
        Ok(row)
    }

    async fn find_by_id(
        &self,
        id: NotificationId,
    ) -> Result<Option<Notification>, RepositoryError> {
        Ok(self.tables()?.notifications.get(&id.get()).cloned())
    }

    async fn list_by_receiver(
        &self,
        receiver_id: UserId,
        page: PageRequest,
    ) -> Result<Page<Notification>, RepositoryError> {
        let mut rows: Vec<Notification> = self
            .tables()?
            .notifications
            .values()
            .filter(|row| row.receiver_id == receiver_id)
            .cloned()
            .collect();
        newest_first(&mut rows, |row| (row.created_at, row.id.get()));
        let total = i64::try_from(rows.len()).unwrap_or(i64::MAX);
        Ok(Page::new(page.slice(&rows), total, page))
    }

    async fn unread_by_receiver(
        &self,
        receiver_id: UserId,
    ) -> Result<Vec<Notification>, RepositoryError> {
        let mut rows: Vec<Notification> = self
            .tables()?
            .notifications
            .values()
            .filter(|row| row.receiver_id == receiver_id && !row.checked)
            .cloned()
            .collect();
        newest_first(&mut rows, |row| (row.created_at, row.id.get()));
        Ok(rows)
    }

    async fn count_unread(&self, receiver_id: UserId) -> Result<i64, RepositoryError> {
        let tables = self.tables()?;
        Ok(count(
            tables
                .notifications
                .values()
                .filter(|row| row.receiver_id == receiver_id && !row.checked),
        ))
    }

    async fn mark_read(&self, id: NotificationId) -> Result<bool, RepositoryError> {
        let now = self.now();
        let mut tables = self.tables()?;
        let Some(row) = tables.notifications.get_mut(&id.get()) else {
            return Ok(false);
        };
        row.checked = true;
        row.updated_at = now;
        Ok(true)
    }

    async fn mark_all_read(&self, receiver_id: UserId) -> Result<u64, RepositoryError> {
        let now = self.now();
        let mut tables = self.tables()?;
        let mut changed = 0_u64;
        for row in tables.notifications.values_mut() {
            if row.receiver_id == receiver_id && !row.checked {
                row.checked = true;
                row.updated_at = now;
                changed += 1;
            }
        }
        Ok(changed)
    }
}
