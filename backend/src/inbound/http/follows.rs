//! Follow graph handlers.
//!
//! ```text
//! POST|DELETE /api/v1/follow/{user_id}
//! GET /api/v1/follow/followers?user_id=7&page=1
//! GET /api/v1/follow/following
//! GET /api/v1/follow/status/{user_id}
//! ```

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

use crate::domain::{Error, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{FollowStatusResponse, MessageResponse, UserPage};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::PageQuery;

/// Whose edges to list; defaults to the caller.
#[derive(Debug, Default, Deserialize, Serialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FollowListQuery {
    pub user_id: Option<i64>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl FollowListQuery {
    fn subject(&self, caller: UserId) -> UserId {
        self.user_id.map_or(caller, UserId::new)
    }

    fn page(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/follow/{user_id}",
    params(("user_id" = i64, Path, description = "Account to follow")),
    responses(
        (status = 201, description = "Now following", body = FollowStatusResponse),
        (status = 400, description = "Self-follow or already following", body = Error),
        (status = 403, description = "Blocked by that user", body = Error),
        (status = 404, description = "No such user", body = Error)
    ),
    tags = ["social"],
    operation_id = "follow",
    security(("BearerAuth" = []))
)]
#[post("/follow/{user_id}")]
pub async fn follow(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let follower = session.require_user_id()?;
    state
        .social
        .follow(follower, UserId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::Created().json(FollowStatusResponse { is_following: true }))
}

#[utoipa::path(
    delete,
    path = "/api/v1/follow/{user_id}",
    params(("user_id" = i64, Path, description = "Account to unfollow")),
    responses(
        (status = 200, description = "Unfollowed", body = MessageResponse),
        (status = 404, description = "Not following", body = Error)
    ),
    tags = ["social"],
    operation_id = "unfollow",
    security(("BearerAuth" = []))
)]
#[delete("/follow/{user_id}")]
pub async fn unfollow(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<web::Json<MessageResponse>> {
    let follower = session.require_user_id()?;
    state
        .social
        .unfollow(follower, UserId::new(path.into_inner()))
        .await?;
    Ok(web::Json(MessageResponse::new("unfollowed")))
}

#[utoipa::path(
    get,
    path = "/api/v1/follow/followers",
    params(FollowListQuery),
    responses(
        (status = 200, description = "Followers, newest edge first", body = UserPage),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["social"],
    operation_id = "followers",
    security(("BearerAuth" = []))
)]
#[get("/follow/followers")]
pub async fn followers(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<FollowListQuery>,
) -> ApiResult<web::Json<UserPage>> {
    let caller = session.require_user_id()?;
    let page = query.page().to_request()?;
    let users = state
        .social
        .followers(query.subject(caller), page)
        .await?;
    Ok(web::Json(users.into()))
}

#[utoipa::path(
    get,
    path = "/api/v1/follow/following",
    params(FollowListQuery),
    responses(
        (status = 200, description = "Followed accounts, newest edge first", body = UserPage),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["social"],
    operation_id = "following",
    security(("BearerAuth" = []))
)]
#[get("/follow/following")]
pub async fn following(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<FollowListQuery>,
) -> ApiResult<web::Json<UserPage>> {
    let caller = session.require_user_id()?;
    let page = query.page().to_request()?;
    let users = state
        .social
        .following(query.subject(caller), page)
        .await?;
    Ok(web::Json(users.into()))
}

#[utoipa::path(
    get,
    path = "/api/v1/follow/status/{user_id}",
    params(("user_id" = i64, Path, description = "Account to check")),
    responses(
        (status = 200, description = "Follow state", body = FollowStatusResponse)
    ),
    tags = ["social"],
    operation_id = "followStatus",
    security(("BearerAuth" = []))
)]
#[get("/follow/status/{user_id}")]
pub async fn follow_status(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<web::Json<FollowStatusResponse>> {
    let follower = session.require_user_id()?;
    let is_following = state
        .social
        .is_following(follower, UserId::new(path.into_inner()))
        .await?;
    Ok(web::Json(FollowStatusResponse { is_following }))
}
