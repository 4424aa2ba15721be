//! Wardrobe item handlers.
//!
//! ```text
//! POST /api/v1/items {"super_item":"tops","season":1,"tpo":2,"color":7,"rating":4.5}
//! GET /api/v1/items
//! DELETE /api/v1/items {"item_ids":[1,2]}
//! GET /api/v1/items/statistics
//! GET /api/v1/items/search?season=1&color=7&min_rating=3
//! GET|PUT|DELETE /api/v1/items/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    Color, Error, ItemFilter, ItemId, ItemUpdate, NewItem, Season, Tpo, UserId,
    validate_super_item,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{
    AffectedResponse, ItemPage, ItemResponse, ItemStatisticsResponse, MessageResponse,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, ImagePayload, PageQuery, decode_image, item_field_error, parse_code,
    parse_optional_code, parse_optional_rating, parse_rating,
};

const RATING: FieldName = FieldName::new("rating");

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateItemRequest {
    /// Category label such as `tops` or `shoes`.
    pub super_item: String,
    #[schema(minimum = 1, maximum = 5)]
    pub season: i16,
    #[schema(minimum = 1, maximum = 5)]
    pub tpo: i16,
    #[schema(minimum = 1, maximum = 15)]
    pub color: i16,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub memo: String,
    #[serde(default)]
    #[schema(minimum = 0, maximum = 5)]
    pub rating: f64,
    pub image: Option<ImagePayload>,
}

impl CreateItemRequest {
    fn to_new_item(&self, user_id: UserId) -> Result<NewItem, Error> {
        Ok(NewItem {
            user_id,
            super_item: validate_super_item(&self.super_item).map_err(item_field_error)?,
            season: parse_code::<Season>(self.season)?,
            tpo: parse_code::<Tpo>(self.tpo)?,
            color: parse_code::<Color>(self.color)?,
            content: self.content.clone(),
            memo: self.memo.clone(),
            picture: None,
            rating: parse_rating(RATING, self.rating)?,
        })
    }
}

/// Partial item update; omitted fields are left unchanged.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateItemRequest {
    pub super_item: Option<String>,
    pub season: Option<i16>,
    pub tpo: Option<i16>,
    pub color: Option<i16>,
    pub content: Option<String>,
    pub memo: Option<String>,
    pub rating: Option<f64>,
    pub image: Option<ImagePayload>,
}

impl UpdateItemRequest {
    fn to_update(&self) -> Result<ItemUpdate, Error> {
        Ok(ItemUpdate {
            super_item: self
                .super_item
                .as_deref()
                .map(validate_super_item)
                .transpose()
                .map_err(item_field_error)?,
            season: parse_optional_code::<Season>(self.season)?,
            tpo: parse_optional_code::<Tpo>(self.tpo)?,
            color: parse_optional_code::<Color>(self.color)?,
            content: self.content.clone(),
            memo: self.memo.clone(),
            picture: None,
            rating: parse_optional_rating(RATING, self.rating)?,
        })
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct DeleteItemsRequest {
    pub item_ids: Vec<ItemId>,
}

/// Search filters; every criterion is optional and combined with AND.
#[derive(Debug, Default, Deserialize, Serialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ItemSearchQuery {
    pub user_id: Option<i64>,
    pub season: Option<i16>,
    pub tpo: Option<i16>,
    pub color: Option<i16>,
    pub super_item: Option<String>,
    pub min_rating: Option<f64>,
    pub max_rating: Option<f64>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl ItemSearchQuery {
    fn to_filter(&self) -> Result<ItemFilter, Error> {
        Ok(ItemFilter {
            user_id: self.user_id.map(UserId::new),
            season: parse_optional_code::<Season>(self.season)?,
            tpo: parse_optional_code::<Tpo>(self.tpo)?,
            color: parse_optional_code::<Color>(self.color)?,
            super_item: self
                .super_item
                .as_deref()
                .map(str::trim)
                .filter(|label| !label.is_empty())
                .map(str::to_owned),
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
    path = "/api/v1/items",
    request_body = CreateItemRequest,
    responses(
        (status = 201, description = "Item created", body = ItemResponse),
        (status = 400, description = "Invalid fields or image", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["items"],
    operation_id = "createItem",
    security(("BearerAuth" = []))
)]
#[post("/items")]
pub async fn create_item(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateItemRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let payload = payload.into_inner();
    let item = payload.to_new_item(user_id)?;
    let picture = decode_image(payload.image)?;
    let created = state.items.create_item(item, picture).await?;
    Ok(HttpResponse::Created().json(ItemResponse::from(created)))
}

/// The caller's own items, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/items",
    params(PageQuery),
    responses(
        (status = 200, description = "Items", body = ItemPage),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["items"],
    operation_id = "myItems",
    security(("BearerAuth" = []))
)]
#[get("/items")]
pub async fn my_items(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<ItemPage>> {
    let user_id = session.require_user_id()?;
    let page = query.into_inner().to_request()?;
    let items = state.items.user_items(user_id, page).await?;
    Ok(web::Json(items.into()))
}

/// Delete several items. Unknown ids are skipped; a foreign id fails the
/// whole batch.
#[utoipa::path(
    delete,
    path = "/api/v1/items",
    request_body = DeleteItemsRequest,
    responses(
        (status = 200, description = "Number of items removed", body = AffectedResponse),
        (status = 400, description = "Empty id list", body = Error),
        (status = 403, description = "An item belongs to someone else", body = Error)
    ),
    tags = ["items"],
    operation_id = "deleteItems",
    security(("BearerAuth" = []))
)]
#[delete("/items")]
pub async fn delete_items(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<DeleteItemsRequest>,
) -> ApiResult<web::Json<AffectedResponse>> {
    let user_id = session.require_user_id()?;
    let affected = state
        .items
        .delete_items(user_id, payload.into_inner().item_ids)
        .await?;
    Ok(web::Json(AffectedResponse { affected }))
}

#[utoipa::path(
    get,
    path = "/api/v1/items/statistics",
    responses(
        (status = 200, description = "Wardrobe statistics", body = ItemStatisticsResponse),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["items"],
    operation_id = "itemStatistics",
    security(("BearerAuth" = []))
)]
#[get("/items/statistics")]
pub async fn item_statistics(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<ItemStatisticsResponse>> {
    let user_id = session.require_user_id()?;
    let stats = state.items.statistics(user_id).await?;
    Ok(web::Json(stats.into()))
}

#[utoipa::path(
    get,
    path = "/api/v1/items/search",
    params(ItemSearchQuery),
    responses(
        (status = 200, description = "Matching items, newest first", body = ItemPage),
        (status = 400, description = "Invalid filter or paging", body = Error)
    ),
    tags = ["items"],
    operation_id = "searchItems",
    security([])
)]
#[get("/items/search")]
pub async fn search_items(
    state: web::Data<HttpState>,
    query: web::Query<ItemSearchQuery>,
) -> ApiResult<web::Json<ItemPage>> {
    let filter = query.to_filter()?;
    let page = query.page().to_request()?;
    let items = state.items.search_items(filter, page).await?;
    Ok(web::Json(items.into()))
}

#[utoipa::path(
    get,
    path = "/api/v1/items/{id}",
    params(("id" = i64, Path, description = "Item id")),
    responses(
        (status = 200, description = "Item", body = ItemResponse),
        (status = 404, description = "No such item", body = Error)
    ),
    tags = ["items"],
    operation_id = "getItem",
    security([])
)]
#[get("/items/{id}")]
pub async fn get_item(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<ItemResponse>> {
    let item = state.items.get_item(ItemId::new(path.into_inner())).await?;
    Ok(web::Json(item.into()))
}

/// Owner-only partial update. A new image replaces the stored picture.
#[utoipa::path(
    put,
    path = "/api/v1/items/{id}",
    params(("id" = i64, Path, description = "Item id")),
    request_body = UpdateItemRequest,
    responses(
        (status = 200, description = "Updated item", body = ItemResponse),
        (status = 403, description = "Item belongs to someone else", body = Error),
        (status = 404, description = "No such item", body = Error)
    ),
    tags = ["items"],
    operation_id = "updateItem",
    security(("BearerAuth" = []))
)]
#[put("/items/{id}")]
pub async fn update_item(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
    payload: web::Json<UpdateItemRequest>,
) -> ApiResult<web::Json<ItemResponse>> {
    let user_id = session.require_user_id()?;
    let payload = payload.into_inner();
    let update = payload.to_update()?;
    let picture = decode_image(payload.image)?;
    let item = state
        .items
        .update_item(user_id, ItemId::new(path.into_inner()), update, picture)
        .await?;
    Ok(web::Json(item.into()))
}

#[utoipa::path(
    delete,
    path = "/api/v1/items/{id}",
    params(("id" = i64, Path, description = "Item id")),
    responses(
        (status = 200, description = "Item deleted", body = MessageResponse),
        (status = 403, description = "Item belongs to someone else", body = Error),
        (status = 404, description = "No such item", body = Error)
    ),
    tags = ["items"],
    operation_id = "deleteItem",
    security(("BearerAuth" = []))
)]
#[delete("/items/{id}")]
pub async fn delete_item(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<web::Json<MessageResponse>> {
    let user_id = session.require_user_id()?;
    state
        .items
        .delete_item(user_id, ItemId::new(path.into_inner()))
        .await?;
    Ok(web::Json(MessageResponse::new("item deleted")))
}

#[cfg(test)]
#[path = "items_tests.rs"]
mod tests;
