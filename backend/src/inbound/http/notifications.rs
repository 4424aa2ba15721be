//! Notification inbox handlers.
//!
//! ```text
//! GET /api/v1/notifications?page=1
//! GET /api/v1/notifications/unread
//! GET /api/v1/notifications/unread/count
//! PUT /api/v1/notifications/{id}/read
//! PUT /api/v1/notifications/read_all
//! ```

use actix_web::{get, put, web};

use crate::domain::{Error, NotificationId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{
    AffectedResponse, MessageResponse, NotificationList, NotificationPage, UnreadCountResponse,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::PageQuery;

#[utoipa::path(
    get,
    path = "/api/v1/notifications",
    params(PageQuery),
    responses(
        (status = 200, description = "Inbox page, newest first", body = NotificationPage),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["notifications"],
    operation_id = "notifications",
    security(("BearerAuth" = []))
)]
#[get("/notifications")]
pub async fn list_notifications(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<NotificationPage>> {
    let user_id = session.require_user_id()?;
    let page = query.into_inner().to_request()?;
    let feed = state.social.notifications(user_id, page).await?;
    Ok(web::Json(feed.into()))
}

#[utoipa::path(
    get,
    path = "/api/v1/notifications/unread",
    responses(
        (status = 200, description = "Unread notifications", body = NotificationList),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["notifications"],
    operation_id = "unreadNotifications",
    security(("BearerAuth" = []))
)]
#[get("/notifications/unread")]
pub async fn unread_notifications(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<NotificationList>> {
    let user_id = session.require_user_id()?;
    let unread = state.social.unread_notifications(user_id).await?;
    Ok(web::Json(NotificationList {
        notifications: unread.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/notifications/unread/count",
    responses(
        (status = 200, description = "Unread total", body = UnreadCountResponse),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["notifications"],
    operation_id = "unreadNotificationCount",
    security(("BearerAuth" = []))
)]
#[get("/notifications/unread/count")]
pub async fn unread_count(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<UnreadCountResponse>> {
    let user_id = session.require_user_id()?;
    let unread_count = state.social.unread_notification_count(user_id).await?;
    Ok(web::Json(UnreadCountResponse { unread_count }))
}

#[utoipa::path(
    put,
    path = "/api/v1/notifications/read_all",
    responses(
        (status = 200, description = "Notifications marked read", body = AffectedResponse),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["notifications"],
    operation_id = "markAllNotificationsRead",
    security(("BearerAuth" = []))
)]
#[put("/notifications/read_all")]
pub async fn mark_all_read(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<AffectedResponse>> {
    let user_id = session.require_user_id()?;
    let affected = state.social.mark_all_as_read(user_id).await?;
    Ok(web::Json(AffectedResponse { affected }))
}

#[utoipa::path(
    put,
    path = "/api/v1/notifications/{id}/read",
    params(("id" = i64, Path, description = "Notification id")),
    responses(
        (status = 200, description = "Notification marked read", body = MessageResponse),
        (status = 403, description = "Addressed to someone else", body = Error),
        (status = 404, description = "No such notification", body = Error)
    ),
    tags = ["notifications"],
    operation_id = "markNotificationRead",
    security(("BearerAuth" = []))
)]
#[put("/notifications/{id}/read")]
pub async fn mark_read(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<web::Json<MessageResponse>> {
    let user_id = session.require_user_id()?;
    state
        .social
        .mark_as_read(user_id, NotificationId::new(path.into_inner()))
        .await?;
    Ok(web::Json(MessageResponse::new("notification marked as read")))
}

#[cfg(test)]
#[path = "notifications_tests.rs"]
mod tests;
