//! Coordinate handlers: outfits, the follow timeline, likes and the comment
//! thread of a coordinate.
//!
//! ```text
//! POST /api/v1/coordinates {"season":2,"tpo":2,"item_ids":[1,2],"si_shoe_size":24.5}
//! GET /api/v1/coordinates
//! GET /api/v1/coordinates/timeline
//! GET /api/v1/coordinates/statistics
//! GET /api/v1/coordinates/search?season=2&min_rating=3
//! GET|PUT|DELETE /api/v1/coordinates/{id}
//! POST|DELETE /api/v1/coordinates/{id}/like
//! GET /api/v1/coordinates/{id}/comments
//! ```
//!
//! Size codes use `0` for "not recorded"; on update an explicit `0` clears
//! the stored value while an omitted field leaves it untouched.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    AttributeCodeError, BottomType, CoordinateFilter, CoordinateId, CoordinateUpdate, Error,
    ItemId, Length, NewCoordinate, OuterLength, OuterSleeve, Season, SizeInfo, Sleeve, TopLength,
    Tpo, UserId, validate_item_ids, validate_shoe_size,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{
    CommentPage, CoordinateList, CoordinatePage, CoordinateResponse,
    CoordinateStatisticsResponse, LikeStatusResponse, MessageResponse,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, ImagePayload, PageQuery, coordinate_field_error, decode_image, parse_code,
    parse_optional_code, parse_optional_rating, parse_rating, parse_size_code,
};

const RATING: FieldName = FieldName::new("rating");

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateCoordinateRequest {
    pub season: i16,
    pub tpo: i16,
    #[serde(default)]
    pub memo: String,
    #[serde(default)]
    pub rating: f64,
    /// Items composing the outfit; duplicates are ignored.
    pub item_ids: Vec<ItemId>,
    #[serde(default)]
    pub si_top_length: i16,
    #[serde(default)]
    pub si_top_sleeve: i16,
    #[serde(default)]
    pub si_bottom_length: i16,
    #[serde(default)]
    pub si_bottom_type: i16,
    #[serde(default)]
    pub si_dress_length: i16,
    #[serde(default)]
    pub si_dress_sleeve: i16,
    #[serde(default)]
    pub si_outer_length: i16,
    #[serde(default)]
    pub si_outer_sleeve: i16,
    #[serde(default)]
    #[schema(minimum = 0, maximum = 40)]
    pub si_shoe_size: f64,
    pub image: Option<ImagePayload>,
}

impl CreateCoordinateRequest {
    fn to_new_coordinate(&self, user_id: UserId) -> Result<(NewCoordinate, Vec<ItemId>), Error> {
        let item_ids = validate_item_ids(&self.item_ids).map_err(coordinate_field_error)?;
        let sizes = SizeInfo {
            top_length: parse_size_code::<TopLength>(self.si_top_length)?,
            top_sleeve: parse_size_code::<Sleeve>(self.si_top_sleeve)?,
            bottom_length: parse_size_code::<Length>(self.si_bottom_length)?,
            bottom_type: parse_size_code::<BottomType>(self.si_bottom_type)?,
            dress_length: parse_size_code::<Length>(self.si_dress_length)?,
            dress_sleeve: parse_size_code::<Sleeve>(self.si_dress_sleeve)?,
            outer_length: parse_size_code::<OuterLength>(self.si_outer_length)?,
            outer_sleeve: parse_size_code::<OuterSleeve>(self.si_outer_sleeve)?,
            shoe_size: validate_shoe_size(self.si_shoe_size).map_err(coordinate_field_error)?,
        };
        let coordinate = NewCoordinate {
            user_id,
            season: parse_code::<Season>(self.season)?,
            tpo: parse_code::<Tpo>(self.tpo)?,
            picture: None,
            memo: self.memo.clone(),
            rating: parse_rating(RATING, self.rating)?,
            sizes,
        };
        Ok((coordinate, item_ids))
    }
}

/// Partial coordinate update.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateCoordinateRequest {
    pub season: Option<i16>,
    pub tpo: Option<i16>,
    pub memo: Option<String>,
    pub rating: Option<f64>,
    /// Replaces the item set when non-empty.
    pub item_ids: Option<Vec<ItemId>>,
    pub si_top_length: Option<i16>,
    pub si_top_sleeve: Option<i16>,
    pub si_bottom_length: Option<i16>,
    pub si_bottom_type: Option<i16>,
    pub si_dress_length: Option<i16>,
    pub si_dress_sleeve: Option<i16>,
    pub si_outer_length: Option<i16>,
    pub si_outer_sleeve: Option<i16>,
    pub si_shoe_size: Option<f64>,
    pub image: Option<ImagePayload>,
}

fn size_update<T>(code: Option<i16>) -> Result<Option<Option<T>>, Error>
where
    T: TryFrom<i16, Error = AttributeCodeError>,
{
    code.map(parse_size_code).transpose()
}

impl UpdateCoordinateRequest {
    fn to_update(&self) -> Result<CoordinateUpdate, Error> {
        Ok(CoordinateUpdate {
            season: parse_optional_code::<Season>(self.season)?,
            tpo: parse_optional_code::<Tpo>(self.tpo)?,
            picture: None,
            memo: self.memo.clone(),
            rating: parse_optional_rating(RATING, self.rating)?,
            top_length: size_update(self.si_top_length)?,
            top_sleeve: size_update(self.si_top_sleeve)?,
            bottom_length: size_update(self.si_bottom_length)?,
            bottom_type: size_update(self.si_bottom_type)?,
            dress_length: size_update(self.si_dress_length)?,
            dress_sleeve: size_update(self.si_dress_sleeve)?,
            outer_length: size_update(self.si_outer_length)?,
            outer_sleeve: size_update(self.si_outer_sleeve)?,
            shoe_size: self
                .si_shoe_size
                .map(validate_shoe_size)
                .transpose()
                .map_err(coordinate_field_error)?,
        })
    }

    fn item_ids(&self) -> Option<Vec<ItemId>> {
        self.item_ids.clone().filter(|ids| !ids.is_empty())
    }
}

#[derive(Debug, Default, Deserialize, Serialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CoordinateSearchQuery {
    pub user_id: Option<i64>,
    pub season: Option<i16>,
    pub tpo: Option<i16>,
    pub min_rating: Option<f64>,
    pub max_rating: Option<f64>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl CoordinateSearchQuery {
    fn to_filter(&self) -> Result<CoordinateFilter, Error> {
        Ok(CoordinateFilter {
            user_id: self.user_id.map(UserId::new),
            season: parse_optional_code::<Season>(self.season)?,
            tpo: parse_optional_code::<Tpo>(self.tpo)?,
            min_rating: parse_optional_rating(FieldName::new("min_rating"), self.min_rating)?,
            max_rating: parse_optional_rating(FieldName::new("max_rating"), self.max_rating)?,
        })
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
    path = "/api/v1/coordinates",
    request_body = CreateCoordinateRequest,
    responses(
        (status = 201, description = "Coordinate created", body = CoordinateResponse),
        (status = 400, description = "Invalid fields", body = Error),
        (status = 403, description = "An item belongs to someone else", body = Error),
        (status = 404, description = "An item does not exist", body = Error)
    ),
    tags = ["coordinates"],
    operation_id = "createCoordinate",
    security(("BearerAuth" = []))
)]
#[post("/coordinates")]
pub async fn create_coordinate(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateCoordinateRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let payload = payload.into_inner();
    let (coordinate, item_ids) = payload.to_new_coordinate(user_id)?;
    let picture = decode_image(payload.image)?;
    let created = state
        .coordinates
        .create_coordinate(coordinate, item_ids, picture)
        .await?;
    Ok(HttpResponse::Created().json(CoordinateResponse::from(created)))
}

#[utoipa::path(
    get,
    path = "/api/v1/coordinates",
    params(PageQuery),
    responses(
        (status = 200, description = "Own coordinates, newest first", body = CoordinatePage),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["coordinates"],
    operation_id = "myCoordinates",
    security(("BearerAuth" = []))
)]
#[get("/coordinates")]
pub async fn my_coordinates(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<CoordinatePage>> {
    let user_id = session.require_user_id()?;
    let page = query.into_inner().to_request()?;
    let coordinates = state
        .coordinates
        .user_coordinates(user_id, page, Some(user_id))
        .await?;
    Ok(web::Json(coordinates.into()))
}

/// Recent coordinates from followed users, skipping blocked accounts.
///
/// At most ten per followed account; the feed is not paged.
#[utoipa::path(
    get,
    path = "/api/v1/coordinates/timeline",
    responses(
        (status = 200, description = "Timeline, newest first", body = CoordinateList),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["coordinates"],
    operation_id = "timeline",
    security(("BearerAuth" = []))
)]
#[get("/coordinates/timeline")]
pub async fn timeline(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<CoordinateList>> {
    let user_id = session.require_user_id()?;
    let coordinates = state.coordinates.timeline(user_id).await?;
    Ok(web::Json(CoordinateList {
        coordinates: coordinates.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/coordinates/statistics",
    responses(
        (status = 200, description = "Coordinate statistics", body = CoordinateStatisticsResponse),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["coordinates"],
    operation_id = "coordinateStatistics",
    security(("BearerAuth" = []))
)]
#[get("/coordinates/statistics")]
pub async fn coordinate_statistics(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<CoordinateStatisticsResponse>> {
    let user_id = session.require_user_id()?;
    let stats = state.coordinates.statistics(user_id).await?;
    Ok(web::Json(stats.into()))
}

#[utoipa::path(
    get,
    path = "/api/v1/coordinates/search",
    params(CoordinateSearchQuery),
    responses(
        (status = 200, description = "Matching coordinates, newest first", body = CoordinatePage),
        (status = 400, description = "Invalid filter or paging", body = Error)
    ),
    tags = ["coordinates"],
    operation_id = "searchCoordinates",
    security([], ("BearerAuth" = []))
)]
#[get("/coordinates/search")]
pub async fn search_coordinates(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<CoordinateSearchQuery>,
) -> ApiResult<web::Json<CoordinatePage>> {
    let filter = query.to_filter()?;
    let page = query.page().to_request()?;
    let coordinates = state
        .coordinates
        .search_coordinates(filter, page, session.viewer())
        .await?;
    Ok(web::Json(coordinates.into()))
}

#[utoipa::path(
    get,
    path = "/api/v1/coordinates/{id}",
    params(("id" = i64, Path, description = "Coordinate id")),
    responses(
        (status = 200, description = "Coordinate with counters", body = CoordinateResponse),
        (status = 404, description = "No such coordinate", body = Error)
    ),
    tags = ["coordinates"],
    operation_id = "getCoordinate",
    security([], ("BearerAuth" = []))
)]
#[get("/coordinates/{id}")]
pub async fn get_coordinate(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<web::Json<CoordinateResponse>> {
    let coordinate = state
        .coordinates
        .get_coordinate(CoordinateId::new(path.into_inner()), session.viewer())
        .await?;
    Ok(web::Json(coordinate.into()))
}

#[utoipa::path(
    put,
    path = "/api/v1/coordinates/{id}",
    params(("id" = i64, Path, description = "Coordinate id")),
    request_body = UpdateCoordinateRequest,
    responses(
        (status = 200, description = "Updated coordinate", body = CoordinateResponse),
        (status = 400, description = "Invalid fields", body = Error),
        (status = 403, description = "Coordinate belongs to someone else", body = Error),
        (status = 404, description = "No such coordinate", body = Error)
    ),
    tags = ["coordinates"],
    operation_id = "updateCoordinate",
    security(("BearerAuth" = []))
)]
#[put("/coordinates/{id}")]
pub async fn update_coordinate(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
    payload: web::Json<UpdateCoordinateRequest>,
) -> ApiResult<web::Json<CoordinateResponse>> {
    let user_id = session.require_user_id()?;
    let payload = payload.into_inner();
    let update = payload.to_update()?;
    let item_ids = payload.item_ids();
    let picture = decode_image(payload.image)?;
    let coordinate = state
        .coordinates
        .update_coordinate(
            user_id,
            CoordinateId::new(path.into_inner()),
            update,
            item_ids,
            picture,
        )
        .await?;
    Ok(web::Json(coordinate.into()))
}

/// Delete a coordinate; its items are detached, not removed.
#[utoipa::path(
    delete,
    path = "/api/v1/coordinates/{id}",
    params(("id" = i64, Path, description = "Coordinate id")),
    responses(
        (status = 200, description = "Coordinate deleted", body = MessageResponse),
        (status = 403, description = "Coordinate belongs to someone else", body = Error),
        (status = 404, description = "No such coordinate", body = Error)
    ),
    tags = ["coordinates"],
    operation_id = "deleteCoordinate",
    security(("BearerAuth" = []))
)]
#[delete("/coordinates/{id}")]
pub async fn delete_coordinate(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<web::Json<MessageResponse>> {
    let user_id = session.require_user_id()?;
    state
        .coordinates
        .delete_coordinate(user_id, CoordinateId::new(path.into_inner()))
        .await?;
    Ok(web::Json(MessageResponse::new("coordinate deleted")))
}

async fn like_status(
    state: &HttpState,
    coordinate_id: CoordinateId,
    is_liked: bool,
) -> Result<LikeStatusResponse, Error> {
    let like_count = state.social.like_count(coordinate_id).await?;
    Ok(LikeStatusResponse {
        coordinate_id,
        is_liked,
        like_count,
    })
}

#[utoipa::path(
    post,
    path = "/api/v1/coordinates/{id}/like",
    params(("id" = i64, Path, description = "Coordinate id")),
    responses(
        (status = 201, description = "Liked", body = LikeStatusResponse),
        (status = 400, description = "Already liked", body = Error),
        (status = 404, description = "No such coordinate", body = Error)
    ),
    tags = ["social"],
    operation_id = "likeCoordinate",
    security(("BearerAuth" = []))
)]
#[post("/coordinates/{id}/like")]
pub async fn like_coordinate(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let coordinate_id = CoordinateId::new(path.into_inner());
    state.social.like(user_id, coordinate_id).await?;
    let status = like_status(&state, coordinate_id, true).await?;
    Ok(HttpResponse::Created().json(status))
}

#[utoipa::path(
    delete,
    path = "/api/v1/coordinates/{id}/like",
    params(("id" = i64, Path, description = "Coordinate id")),
    responses(
        (status = 200, description = "Like removed", body = LikeStatusResponse),
        (status = 404, description = "Not liked", body = Error)
    ),
    tags = ["social"],
    operation_id = "unlikeCoordinate",
    security(("BearerAuth" = []))
)]
#[delete("/coordinates/{id}/like")]
pub async fn unlike_coordinate(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<web::Json<LikeStatusResponse>> {
    let user_id = session.require_user_id()?;
    let coordinate_id = CoordinateId::new(path.into_inner());
    state.social.unlike(user_id, coordinate_id).await?;
    Ok(web::Json(like_status(&state, coordinate_id, false).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/coordinates/{id}/comments",
    params(("id" = i64, Path, description = "Coordinate id"), PageQuery),
    responses(
        (status = 200, description = "Comments, newest first", body = CommentPage),
        (status = 404, description = "No such coordinate", body = Error)
    ),
    tags = ["social"],
    operation_id = "coordinateComments",
    security([])
)]
#[get("/coordinates/{id}/comments")]
pub async fn coordinate_comments(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<CommentPage>> {
    let page = query.into_inner().to_request()?;
    let comments = state
        .social
        .coordinate_comments(CoordinateId::new(path.into_inner()), page)
        .await?;
    Ok(web::Json(comments.into()))
}

#[cfg(test)]
#[path = "coordinates_tests.rs"]
mod tests;
