//! PostgreSQL-backed `NotificationRepository`.

use async_trait::async_trait;
use diesel::dsl::now;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::{Page, PageRequest};

use crate::domain::ports::{NotificationRepository, RepositoryError};
use crate::domain::{NewNotification, Notification, NotificationId, UserId};

use super::diesel_basic_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewNotificationRow, NotificationRow};
use super::pool::DbPool;
use super::schema::notifications;

#[derive(Clone)]
pub struct DieselNotificationRepository {
    pool: DbPool,
}

impl DieselNotificationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn into_notifications(rows: Vec<NotificationRow>) -> Result<Vec<Notification>, RepositoryError> {
    rows.into_iter().map(NotificationRow::into_domain).collect()
}

#[async_trait]
impl NotificationRepository for DieselNotificationRepository {
    async fn create(
        &self,
        notification: &NewNotification,
    ) -> Result<Notification, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: NotificationRow = diesel::insert_into(notifications::table)
            .values(NewNotificationRow::from(notification))
            .returning(NotificationRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row.into_domain()
    }

    async fn find_by_id(
        &self,
        id: NotificationId,
    ) -> Result<Option<Notification>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<NotificationRow> = notifications::table
            .find(id.get())
            .select(NotificationRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(NotificationRow::into_domain).transpose()
    }

    async fn list_by_receiver(
        &self,
        receiver_id: UserId,
        page: PageRequest,
    ) -> Result<Page<Notification>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = notifications::table
            .filter(notifications::receiver_id.eq(receiver_id.get()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows: Vec<NotificationRow> = notifications::table
            .filter(notifications::receiver_id.eq(receiver_id.get()))
            .select(NotificationRow::as_select())
            .order((notifications::created_at.desc(), notifications::id.desc()))
            .limit(page.limit())
            .offset(page.offset())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(Page::new(into_notifications(rows)?, total, page))
    }

    async fn unread_by_receiver(
        &self,
        receiver_id: UserId,
    ) -> Result<Vec<Notification>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<NotificationRow> = notifications::table
            .filter(notifications::receiver_id.eq(receiver_id.get()))
            .filter(notifications::checked.eq(false))
            .select(NotificationRow::as_select())
            .order((notifications::created_at.desc(), notifications::id.desc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        into_notifications(rows)
    }

    async fn count_unread(&self, receiver_id: UserId) -> Result<i64, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        notifications::table
            .filter(notifications::receiver_id.eq(receiver_id.get()))
            .filter(notifications::checked.eq(false))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn mark_read(&self, id: NotificationId) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changed = diesel::update(notifications::table.find(id.get()))
            .set((
                notifications::checked.eq(true),
                notifications::updated_at.eq(now),
            ))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(changed > 0)
    }

    async fn mark_all_read(&self, receiver_id: UserId) -> Result<u64, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changed = diesel::update(
            notifications::table
                .filter(notifications::receiver_id.eq(receiver_id.get()))
                .filter(notifications::checked.eq(false)),
        )
        .set((
            notifications::checked.eq(true),
            notifications::updated_at.eq(now),
        ))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(changed as u64)
    }
}
