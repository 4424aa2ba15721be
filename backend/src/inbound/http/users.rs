//! User account handlers.
//!
//! ```text
//! GET /api/v1/users?page=1&per_page=20
//! GET /api/v1/users/me
//! PUT /api/v1/users/profile {"name":"Aiko","image":{"file_name":"me.png","data":"..."}}
//! PUT /api/v1/users/password {"current_password":"...","new_password":"..."}
//! GET|PUT|DELETE /api/v1/users/{id}
//! GET /api/v1/users/{user_id}/items
//! GET /api/v1/users/{user_id}/coordinates
//! ```

use actix_web::{delete, get, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{EmailAddress, Error, PasswordChange, UserId, UserName, UserUpdate};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{CoordinatePage, ItemPage, MessageResponse, UserPage, UserResponse};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{ImagePayload, PageQuery, decode_image, user_field_error};

/// Profile fields; omitted fields are left unchanged.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    /// Replacement profile picture. Ignored by `PUT /users/{id}`.
    pub image: Option<ImagePayload>,
}

impl UpdateUserRequest {
    fn to_update(&self) -> Result<UserUpdate, Error> {
        Ok(UserUpdate {
            name: self
                .name
                .as_deref()
                .map(UserName::new)
                .transpose()
                .map_err(user_field_error)?,
            email: self
                .email
                .as_deref()
                .map(EmailAddress::new)
                .transpose()
                .map_err(user_field_error)?,
            picture: None,
        })
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    #[schema(min_length = 6)]
    pub new_password: String,
}

#[utoipa::path(
    get,
    path = "/api/v1/users",
    params(PageQuery),
    responses(
        (status = 200, description = "Accounts, newest first", body = UserPage),
        (status = 400, description = "Invalid paging", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers",
    security(("BearerAuth" = []))
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<UserPage>> {
    session.require_user_id()?;
    let page = query.into_inner().to_request()?;
    let users = state.accounts.list_users(page).await?;
    Ok(web::Json(users.into()))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Authenticated account", body = UserResponse),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["users"],
    operation_id = "currentUser",
    security(("BearerAuth" = []))
)]
#[get("/users/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<UserResponse>> {
    let user_id = session.require_user_id()?;
    let user = state.accounts.get_user(user_id).await?;
    Ok(web::Json(user.into()))
}

/// Update the caller's own profile, optionally replacing the picture.
#[utoipa::path(
    put,
    path = "/api/v1/users/profile",
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated account", body = UserResponse),
        (status = 400, description = "Invalid fields or e-mail taken", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateProfile",
    security(("BearerAuth" = []))
)]
#[put("/users/profile")]
pub async fn update_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<UpdateUserRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let user_id = session.require_user_id()?;
    let payload = payload.into_inner();
    let update = payload.to_update()?;
    let picture = decode_image(payload.image)?;
    let user = state
        .accounts
        .update_profile(user_id, update, picture)
        .await?;
    Ok(web::Json(user.into()))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 400, description = "Wrong current password or weak replacement", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["users"],
    operation_id = "changePassword",
    security(("BearerAuth" = []))
)]
#[put("/users/password")]
pub async fn change_password(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ChangePasswordRequest>,
) -> ApiResult<web::Json<MessageResponse>> {
    let user_id = session.require_user_id()?;
    let change = PasswordChange::try_new(&payload.current_password, &payload.new_password)
        .map_err(user_field_error)?;
    state.accounts.change_password(user_id, &change).await?;
    Ok(web::Json(MessageResponse::new("password updated")))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "Public profile", body = UserResponse),
        (status = 404, description = "No such user", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUser",
    security([])
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<UserResponse>> {
    let user = state.accounts.get_user(UserId::new(path.into_inner())).await?;
    Ok(web::Json(user.into()))
}

/// Update another account; only the owner or an admin may.
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    params(("id" = i64, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated account", body = UserResponse),
        (status = 403, description = "Not the owner or an admin", body = Error),
        (status = 404, description = "No such user", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateUser",
    security(("BearerAuth" = []))
)]
#[put("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
    payload: web::Json<UpdateUserRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let requester = session.require_user_id()?;
    let update = payload.to_update()?;
    let user = state
        .accounts
        .update_user(requester, UserId::new(path.into_inner()), update)
        .await?;
    Ok(web::Json(user.into()))
}

/// Delete an account and everything it owns.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "Account deleted", body = MessageResponse),
        (status = 403, description = "Not the owner or an admin", body = Error),
        (status = 404, description = "No such user", body = Error)
    ),
    tags = ["users"],
    operation_id = "deleteUser",
    security(("BearerAuth" = []))
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<web::Json<MessageResponse>> {
    let requester = session.require_user_id()?;
    state
        .accounts
        .delete_user(requester, UserId::new(path.into_inner()))
        .await?;
    Ok(web::Json(MessageResponse::new("user deleted")))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/items",
    params(("user_id" = i64, Path, description = "Owner id"), PageQuery),
    responses(
        (status = 200, description = "Items, newest first", body = ItemPage),
        (status = 400, description = "Invalid paging", body = Error)
    ),
    tags = ["items"],
    operation_id = "userItems",
    security([])
)]
#[get("/users/{user_id}/items")]
pub async fn user_items(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<ItemPage>> {
    let page = query.into_inner().to_request()?;
    let items = state
        .items
        .user_items(UserId::new(path.into_inner()), page)
        .await?;
    Ok(web::Json(items.into()))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/coordinates",
    params(("user_id" = i64, Path, description = "Owner id"), PageQuery),
    responses(
        (status = 200, description = "Coordinates, newest first", body = CoordinatePage),
        (status = 400, description = "Invalid paging", body = Error)
    ),
    tags = ["coordinates"],
    operation_id = "userCoordinates",
    security([], ("BearerAuth" = []))
)]
#[get("/users/{user_id}/coordinates")]
pub async fn user_coordinates(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<CoordinatePage>> {
    let page = query.into_inner().to_request()?;
    let coordinates = state
        .coordinates
        .user_coordinates(UserId::new(path.into_inner()), page, session.viewer())
        .await?;
    Ok(web::Json(coordinates.into()))
}

#[cfg(test)]
#[path = "users_tests.rs"]
mod tests;
