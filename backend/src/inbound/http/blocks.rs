//! Block list handlers.
//!
//! ```text
//! POST|DELETE /api/v1/blocks/{user_id}
//! GET /api/v1/blocks
//! GET /api/v1/blocks/status/{user_id}
//! ```

use actix_web::{HttpResponse, delete, get, post, web};

use crate::domain::{Error, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{BlockStatusResponse, MessageResponse, UserList};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

#[utoipa::path(
    post,
    path = "/api/v1/blocks/{user_id}",
    params(("user_id" = i64, Path, description = "Account to block")),
    responses(
        (status = 201, description = "Blocked", body = BlockStatusResponse),
        (status = 400, description = "Self-block or already blocked", body = Error),
        (status = 404, description = "No such user", body = Error)
    ),
    tags = ["social"],
    operation_id = "block",
    security(("BearerAuth" = []))
)]
#[post("/blocks/{user_id}")]
pub async fn block(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let blocker = session.require_user_id()?;
    state
        .social
        .block(blocker, UserId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::Created().json(BlockStatusResponse { is_blocked: true }))
}

#[utoipa::path(
    delete,
    path = "/api/v1/blocks/{user_id}",
    params(("user_id" = i64, Path, description = "Account to unblock")),
    responses(
        (status = 200, description = "Unblocked", body = MessageResponse),
        (status = 404, description = "Not blocked", body = Error)
    ),
    tags = ["social"],
    operation_id = "unblock",
    security(("BearerAuth" = []))
)]
#[delete("/blocks/{user_id}")]
pub async fn unblock(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<web::Json<MessageResponse>> {
    let blocker = session.require_user_id()?;
    state
        .social
        .unblock(blocker, UserId::new(path.into_inner()))
        .await?;
    Ok(web::Json(MessageResponse::new("unblocked")))
}

#[utoipa::path(
    get,
    path = "/api/v1/blocks",
    responses(
        (status = 200, description = "Accounts the caller blocked", body = UserList),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["social"],
    operation_id = "blockedUsers",
    security(("BearerAuth" = []))
)]
#[get("/blocks")]
pub async fn blocked_users(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<UserList>> {
    let blocker = session.require_user_id()?;
    let users = state.social.blocked_users(blocker).await?;
    Ok(web::Json(UserList {
        users: users.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/blocks/status/{user_id}",
    params(("user_id" = i64, Path, description = "Account to check")),
    responses(
        (status = 200, description = "Block state", body = BlockStatusResponse)
    ),
    tags = ["social"],
    operation_id = "blockStatus",
    security(("BearerAuth" = []))
)]
#[get("/blocks/status/{user_id}")]
pub async fn block_status(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<web::Json<BlockStatusResponse>> {
    let blocker = session.require_user_id()?;
    let is_blocked = state
        .social
        .is_blocked(blocker, UserId::new(path.into_inner()))
        .await?;
    Ok(web::Json(BlockStatusResponse { is_blocked }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use mockall::predicate::eq;
    use serde_json::{Value, json};

    use crate::domain::ports::{MockSocialService, MockTokenService};
    use crate::domain::{Error, UserId};
    use crate::inbound::http::test_utils::{
        TestBackend, bearer, signup, state_with_tokens, test_app,
    };

    #[actix_web::test]
    async fn block_list_round_trip() {
        let app = actix_test::init_service(test_app(TestBackend::new().state)).await;
        let (aiko, _) = signup(&app, "aiko").await;
        let (_, bram_id) = signup(&app, "bram").await;
        let uri = format!("/api/v1/blocks/{bram_id}");

        let request = actix_test::TestRequest::post()
            .uri(&uri)
            .insert_header(bearer(&aiko))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let request = actix_test::TestRequest::post()
            .uri(&uri)
            .insert_header(bearer(&aiko))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let request = actix_test::TestRequest::get()
            .uri("/api/v1/blocks")
            .insert_header(bearer(&aiko))
            .to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, request).await;
        assert_eq!(body["users"][0]["id"], json!(bram_id.get()));

        let request = actix_test::TestRequest::delete()
            .uri(&uri)
            .insert_header(bearer(&aiko))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);

        let request = actix_test::TestRequest::get()
            .uri(&format!("/api/v1/blocks/status/{bram_id}"))
            .insert_header(bearer(&aiko))
            .to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, request).await;
        assert_eq!(body["is_blocked"], json!(false));
    }

    #[actix_web::test]
    async fn store_outages_surface_as_service_unavailable() {
        let mut tokens = MockTokenService::new();
        tokens
            .expect_verify()
            .returning(|_| Ok(UserId::new(1)));
        let mut social = MockSocialService::new();
        social
            .expect_blocked_users()
            .with(eq(UserId::new(1)))
            .return_once(|_| Err(Error::service_unavailable("store offline")));
        let mut state = state_with_tokens(Arc::new(tokens));
        state.social = Arc::new(social);
        let app = actix_test::init_service(test_app(state)).await;

        let request = actix_test::TestRequest::get()
            .uri("/api/v1/blocks")
            .insert_header(bearer("anything"))
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
