//! Process-local repositories.
//!
//! [`InMemoryStore`] implements every repository port over one
//! mutex-guarded set of tables. It mirrors the PostgreSQL adapters closely
//! enough to stand in for them: unique pairs are reported as
//! [`RepositoryError::Duplicate`] with the same constraint names, deletes
//! cascade the way the foreign keys do, and listings are newest first.
//!
//! The server falls back to it when no database URL is configured.

mod accounts;
mod social;
mod wardrobe;

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use mockable::{Clock, DefaultClock};

use crate::domain::ports::RepositoryError;
use crate::domain::{
    Block, Comment, Coordinate, Item, LikeCoordinate, Notification, Relationship, User,
};

#[derive(Debug, Default)]
struct Tables {
    next_id: i64,
    users: BTreeMap<i64, User>,
    items: BTreeMap<i64, Item>,
    coordinates: BTreeMap<i64, Coordinate>,
    comments: BTreeMap<i64, Comment>,
    likes: BTreeMap<i64, LikeCoordinate>,
    relationships: BTreeMap<i64, Relationship>,
    blocks: BTreeMap<i64, Block>,
    notifications: BTreeMap<i64, Notification>,
}

impl Tables {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    /// Remove a coordinate with everything that references it.
    fn drop_coordinate(&mut self, raw_id: i64) -> bool {
        let Some(coordinate) = self.coordinates.remove(&raw_id) else {
            return false;
        };
        let id = coordinate.id;
        for item in self.items.values_mut() {
            if item.coordinate_id == Some(id) {
                item.coordinate_id = None;
            }
        }
        let comment_ids: Vec<i64> = self
            .comments
            .values()
            .filter(|comment| comment.coordinate_id == id)
            .map(|comment| comment.id.get())
            .collect();
        for comment_id in comment_ids {
            self.drop_comment(comment_id);
        }
        let like_ids: Vec<i64> = self
            .likes
            .values()
            .filter(|like| like.coordinate_id == id)
            .map(|like| like.id.get())
            .collect();
        for like_id in like_ids {
            self.drop_like(like_id);
        }
        self.notifications
            .retain(|_, notification| notification.coordinate_id != Some(id));
        true
    }

    fn drop_comment(&mut self, raw_id: i64) -> bool {
        let Some(comment) = self.comments.remove(&raw_id) else {
            return false;
        };
        self.notifications
            .retain(|_, notification| notification.comment_id != Some(comment.id));
        true
    }

    fn drop_like(&mut self, raw_id: i64) -> bool {
        let Some(like) = self.likes.remove(&raw_id) else {
            return false;
        };
        self.notifications
            .retain(|_, notification| notification.like_coordinate_id != Some(like.id));
        true
    }
}

/// Mutex-guarded repository tables.
#[derive(Clone)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
    clock: Arc<dyn Clock>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new(Arc::new(DefaultClock))
    }
}

impl InMemoryStore {
    /// Create an empty store stamping rows with `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            tables: Arc::new(Mutex::new(Tables::default())),
            clock,
        }
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, RepositoryError> {
        self.tables
            .lock()
            .map_err(|_| RepositoryError::connection("in-memory store lock poisoned"))
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.utc()
    }
}

/// Order rows the way the SQL adapters do: `created_at DESC, id DESC`.
fn newest_first<T>(rows: &mut [T], key: impl Fn(&T) -> (DateTime<Utc>, i64)) {
    rows.sort_by(|left, right| key(right).cmp(&key(left)));
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
