//! Comment handlers.
//!
//! ```text
//! POST /api/v1/comments {"coordinate_id":3,"comment":"Nice layering"}
//! PUT /api/v1/comments/{id} {"comment":"Great layering"}
//! DELETE /api/v1/comments/{id}
//! ```
//!
//! Listing lives under `GET /api/v1/coordinates/{id}/comments`.

use actix_web::{HttpResponse, delete, post, put, web};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use crate::domain::{CommentBody, CommentId, CoordinateId, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{CommentResponse, MessageResponse};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::comment_field_error;

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateCommentRequest {
    pub coordinate_id: CoordinateId,
    #[schema(max_length = 1000)]
    pub comment: String,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateCommentRequest {
    #[schema(max_length = 1000)]
    pub comment: String,
}

#[utoipa::path(
    post,
    path = "/api/v1/comments",
    request_body = CreateCommentRequest,
    responses(
        (status = 201, description = "Comment posted", body = CommentResponse),
        (status = 400, description = "Empty or oversized comment", body = Error),
        (status = 403, description = "Blocked by the coordinate owner", body = Error),
        (status = 404, description = "No such coordinate", body = Error)
    ),
    tags = ["social"],
    operation_id = "createComment",
    security(("BearerAuth" = []))
)]
#[post("/comments")]
pub async fn create_comment(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateCommentRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let payload = payload.into_inner();
    let body = CommentBody::new(payload.comment).map_err(comment_field_error)?;
    let comment = state
        .social
        .create_comment(user_id, payload.coordinate_id, body)
        .await?;
    debug!(comment_id = %comment.comment.id, "comment posted");
    Ok(HttpResponse::Created().json(CommentResponse::from(comment)))
}

#[utoipa::path(
    put,
    path = "/api/v1/comments/{id}",
    params(("id" = i64, Path, description = "Comment id")),
    request_body = UpdateCommentRequest,
    responses(
        (status = 200, description = "Comment edited", body = CommentResponse),
        (status = 403, description = "Comment belongs to someone else", body = Error),
        (status = 404, description = "No such comment", body = Error)
    ),
    tags = ["social"],
    operation_id = "updateComment",
    security(("BearerAuth" = []))
)]
#[put("/comments/{id}")]
pub async fn update_comment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
    payload: web::Json<UpdateCommentRequest>,
) -> ApiResult<web::Json<CommentResponse>> {
    let user_id = session.require_user_id()?;
    let body = CommentBody::new(payload.into_inner().comment).map_err(comment_field_error)?;
    let comment = state
        .social
        .update_comment(user_id, CommentId::new(path.into_inner()), body)
        .await?;
    Ok(web::Json(comment.into()))
}

#[utoipa::path(
    delete,
    path = "/api/v1/comments/{id}",
    params(("id" = i64, Path, description = "Comment id")),
    responses(
        (status = 200, description = "Comment deleted", body = MessageResponse),
        (status = 403, description = "Comment belongs to someone else", body = Error),
        (status = 404, description = "No such comment", body = Error)
    ),
    tags = ["social"],
    operation_id = "deleteComment",
    security(("BearerAuth" = []))
)]
#[delete("/comments/{id}")]
pub async fn delete_comment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<web::Json<MessageResponse>> {
    let user_id = session.require_user_id()?;
    state
        .social
        .delete_comment(user_id, CommentId::new(path.into_inner()))
        .await?;
    Ok(web::Json(MessageResponse::new("comment deleted")))
}
