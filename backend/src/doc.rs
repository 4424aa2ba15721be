//! OpenAPI documentation for the REST API.
//!
//! [`ApiDoc`] collects every handler under `/api/v1` plus the health probes,
//! the request and response bodies, and the bearer token scheme issued by
//! `POST /api/v1/auth/login`. Debug builds serve it through Swagger UI and
//! `cargo run --bin openapi-dump` prints it for external tooling.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::auth::{LoginRequest, SignupRequest};
use crate::inbound::http::comments::{CreateCommentRequest, UpdateCommentRequest};
use crate::inbound::http::coordinates::{CreateCoordinateRequest, UpdateCoordinateRequest};
use crate::inbound::http::dto::{
    AffectedResponse, AuthResponse, BlockStatusResponse, CommentPage, CommentResponse,
    CoordinateList, CoordinatePage, CoordinateResponse, CoordinateStatisticsResponse,
    FollowStatusResponse, ItemPage, ItemResponse, ItemStatisticsResponse, LikeStatusResponse,
    MessageResponse, NotificationList, NotificationPage, NotificationResponse,
    UnreadCountResponse, UserList, UserPage, UserResponse,
};
use crate::inbound::http::items::{CreateItemRequest, DeleteItemsRequest, UpdateItemRequest};
use crate::inbound::http::users::{ChangePasswordRequest, UpdateUserRequest};
use crate::inbound::http::validation::ImagePayload;

/// Name of the security scheme referenced by authenticated handlers.
pub const BEARER_SCHEME: &str = "BearerAuth";

/// Register the JWT bearer scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some(
                        "Access token returned by POST /api/v1/auth/signup or /auth/login.",
                    ))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Speadwear API",
        description = "Wardrobe items, outfit coordinates and the social graph around them."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::auth::signup,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::refresh,
        crate::inbound::http::auth::me,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::update_profile,
        crate::inbound::http::users::change_password,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::users::user_items,
        crate::inbound::http::users::user_coordinates,
        crate::inbound::http::items::create_item,
        crate::inbound::http::items::my_items,
        crate::inbound::http::items::delete_items,
        crate::inbound::http::items::item_statistics,
        crate::inbound::http::items::search_items,
        crate::inbound::http::items::get_item,
        crate::inbound::http::items::update_item,
        crate::inbound::http::items::delete_item,
        crate::inbound::http::coordinates::create_coordinate,
        crate::inbound::http::coordinates::my_coordinates,
        crate::inbound::http::coordinates::timeline,
        crate::inbound::http::coordinates::coordinate_statistics,
        crate::inbound::http::coordinates::search_coordinates,
        crate::inbound::http::coordinates::get_coordinate,
        crate::inbound::http::coordinates::update_coordinate,
        crate::inbound::http::coordinates::delete_coordinate,
        crate::inbound::http::coordinates::like_coordinate,
        crate::inbound::http::coordinates::unlike_coordinate,
        crate::inbound::http::coordinates::coordinate_comments,
        crate::inbound::http::comments::create_comment,
        crate::inbound::http::comments::update_comment,
        crate::inbound::http::comments::delete_comment,
        crate::inbound::http::follows::follow,
        crate::inbound::http::follows::unfollow,
        crate::inbound::http::follows::followers,
        crate::inbound::http::follows::following,
        crate::inbound::http::follows::follow_status,
        crate::inbound::http::blocks::block,
        crate::inbound::http::blocks::unblock,
        crate::inbound::http::blocks::blocked_users,
        crate::inbound::http::blocks::block_status,
        crate::inbound::http::notifications::list_notifications,
        crate::inbound::http::notifications::unread_notifications,
        crate::inbound::http::notifications::unread_count,
        crate::inbound::http::notifications::mark_all_read,
        crate::inbound::http::notifications::mark_read,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        SignupRequest,
        LoginRequest,
        UpdateUserRequest,
        ChangePasswordRequest,
        CreateItemRequest,
        UpdateItemRequest,
        DeleteItemsRequest,
        CreateCoordinateRequest,
        UpdateCoordinateRequest,
        CreateCommentRequest,
        UpdateCommentRequest,
        ImagePayload,
        UserResponse,
        AuthResponse,
        ItemResponse,
        CoordinateResponse,
        CommentResponse,
        NotificationResponse,
        UserPage,
        ItemPage,
        CoordinatePage,
        CommentPage,
        NotificationPage,
        CoordinateList,
        UserList,
        NotificationList,
        ItemStatisticsResponse,
        CoordinateStatisticsResponse,
        LikeStatusResponse,
        FollowStatusResponse,
        BlockStatusResponse,
        UnreadCountResponse,
        AffectedResponse,
        MessageResponse,
        Error,
        ErrorCode,
    )),
    tags(
        (name = "auth", description = "Sign-up, login and token refresh"),
        (name = "users", description = "Accounts and profiles"),
        (name = "items", description = "Wardrobe items"),
        (name = "coordinates", description = "Outfits assembled from items"),
        (name = "social", description = "Likes, comments, follows and blocks"),
        (name = "notifications", description = "Per-user activity inbox"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    #[rstest]
    #[case("/api/v1/auth/login")]
    #[case("/api/v1/items/{id}")]
    #[case("/api/v1/coordinates/{id}/like")]
    #[case("/api/v1/follow/{user_id}")]
    #[case("/api/v1/notifications/read_all")]
    #[case("/health/ready")]
    fn document_lists_handler_paths(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing path {path}");
    }

    #[test]
    fn bearer_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key(BEARER_SCHEME));
    }

    #[test]
    fn error_schema_exposes_code_and_message() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        let Some(RefOr::T(Schema::Object(error))) = components.schemas.get("Error") else {
            panic!("Error schema should be an object");
        };
        assert!(error.properties.contains_key("code"));
        assert!(error.properties.contains_key("message"));
    }
}
