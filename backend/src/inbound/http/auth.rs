//! Authentication handlers.
//!
//! ```text
//! POST /api/v1/auth/signup {"name":"Aiko","email":"aiko@example.com","password":"secret1"}
//! POST /api/v1/auth/login {"email":"aiko@example.com","password":"secret1"}
//! POST /api/v1/auth/logout
//! POST /api/v1/auth/refresh
//! GET /api/v1/auth/me
//! ```
//!
//! Tokens are stateless; logout only tells the client to forget its token.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{Error, LoginCredentials, Registration};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{AuthResponse, MessageResponse, UserResponse};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::user_field_error;

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct SignupRequest {
    #[schema(example = "Aiko")]
    pub name: String,
    #[schema(example = "aiko@example.com")]
    pub email: String,
    #[schema(min_length = 6)]
    pub password: String,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "aiko@example.com")]
    pub email: String,
    pub password: String,
}

/// Register an account and sign it in.
#[utoipa::path(
    post,
    path = "/api/v1/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Invalid fields or e-mail taken", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["auth"],
    operation_id = "signup",
    security([])
)]
#[post("/auth/signup")]
pub async fn signup(
    state: web::Data<HttpState>,
    payload: web::Json<SignupRequest>,
) -> ApiResult<HttpResponse> {
    let SignupRequest {
        name,
        email,
        password,
    } = payload.into_inner();
    let registration = Registration::try_new(&name, &email, &password).map_err(user_field_error)?;
    let session = state.accounts.signup(&registration).await?;
    info!(user_id = %session.user.id, "account registered");
    Ok(HttpResponse::Created().json(AuthResponse::from(session)))
}

/// Exchange credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = AuthResponse),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 403, description = "Account not activated", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<AuthResponse>> {
    let credentials = LoginCredentials::new(&payload.email, &payload.password);
    let session = state.accounts.login(&credentials).await?;
    Ok(web::Json(session.into()))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses(
        (status = 200, description = "Client should discard its token", body = MessageResponse),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["auth"],
    operation_id = "logout",
    security(("BearerAuth" = []))
)]
#[post("/auth/logout")]
pub async fn logout(session: SessionContext) -> ApiResult<web::Json<MessageResponse>> {
    session.require_user_id()?;
    Ok(web::Json(MessageResponse::new("logged out")))
}

/// Issue a fresh token for the caller.
#[utoipa::path(
    post,
    path = "/api/v1/auth/refresh",
    responses(
        (status = 200, description = "New token", body = AuthResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Account no longer exists", body = Error)
    ),
    tags = ["auth"],
    operation_id = "refreshToken",
    security(("BearerAuth" = []))
)]
#[post("/auth/refresh")]
pub async fn refresh(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<AuthResponse>> {
    let user_id = session.require_user_id()?;
    let refreshed = state.accounts.refresh(user_id).await?;
    Ok(web::Json(refreshed.into()))
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "Authenticated account", body = UserResponse),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["auth"],
    operation_id = "me",
    security(("BearerAuth" = []))
)]
#[get("/auth/me")]
pub async fn me(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<UserResponse>> {
    let user_id = session.require_user_id()?;
    let user = state.accounts.get_user(user_id).await?;
    Ok(web::Json(user.into()))
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
