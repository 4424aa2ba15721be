//! HTTP inbound adapter exposing the REST API.
//!
//! Handlers translate JSON requests into domain service calls through the
//! ports held in [`state::HttpState`]. [`configure_api`] mounts every route
//! relative to the `/api/v1` scope.

pub mod auth;
pub mod blocks;
pub mod comments;
pub mod coordinates;
pub mod dto;
pub mod error;
pub mod follows;
pub mod health;
pub mod items;
pub mod notifications;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register the `/api/v1` routes and the extractor error handlers.
///
/// Literal segments (`/items/search`, `/users/me`, ...) are registered ahead
/// of the `{id}` routes that would otherwise capture them.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::payload_error))
        .app_data(web::QueryConfig::default().error_handler(error::payload_error))
        .app_data(web::PathConfig::default().error_handler(error::payload_error));

    cfg.service(auth::signup)
        .service(auth::login)
        .service(auth::logout)
        .service(auth::refresh)
        .service(auth::me);

    cfg.service(users::list_users)
        .service(users::current_user)
        .service(users::update_profile)
        .service(users::change_password)
        .service(users::get_user)
        .service(users::update_user)
        .service(users::delete_user)
        .service(users::user_items)
        .service(users::user_coordinates);

    cfg.service(items::create_item)
        .service(items::my_items)
        .service(items::delete_items)
        .service(items::item_statistics)
        .service(items::search_items)
        .service(items::get_item)
        .service(items::update_item)
        .service(items::delete_item);

    cfg.service(coordinates::create_coordinate)
        .service(coordinates::my_coordinates)
        .service(coordinates::timeline)
        .service(coordinates::coordinate_statistics)
        .service(coordinates::search_coordinates)
        .service(coordinates::get_coordinate)
        .service(coordinates::update_coordinate)
        .service(coordinates::delete_coordinate)
        .service(coordinates::like_coordinate)
        .service(coordinates::unlike_coordinate)
        .service(coordinates::coordinate_comments);

    cfg.service(comments::create_comment)
        .service(comments::update_comment)
        .service(comments::delete_comment);

    cfg.service(follows::followers)
        .service(follows::following)
        .service(follows::follow_status)
        .service(follows::follow)
        .service(follows::unfollow);

    cfg.service(blocks::blocked_users)
        .service(blocks::block_status)
        .service(blocks::block)
        .service(blocks::unblock);

    cfg.service(notifications::list_notifications)
        .service(notifications::unread_notifications)
        .service(notifications::unread_count)
        .service(notifications::mark_all_read)
        .service(notifications::mark_read);
}
