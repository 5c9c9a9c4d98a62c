use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::{
        cart::{CartQuote, QuoteRequest},
        catalog::{CatalogList, OfferList},
    },
    error::AppResult,
    response::ApiResponse,
    services::{cart_service, catalog_service, offer_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{event_id}/catalog", get(list_catalog))
        .route("/{event_id}/offers", get(list_offers))
        .route("/{event_id}/cart/quote", post(quote_cart))
}

#[utoipa::path(
    get,
    path = "/api/events/{event_id}/catalog",
    params(("event_id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event catalog with remaining allotments", body = ApiResponse<CatalogList>),
        (status = 500, description = "Internal Server Error"),
    ),
    tag = "Catalog"
)]
pub async fn list_catalog(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<CatalogList>>> {
    let resp = catalog_service::list_catalog(&state, event_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/events/{event_id}/offers",
    params(("event_id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Automatic offers running now", body = ApiResponse<OfferList>),
    ),
    tag = "Catalog"
)]
pub async fn list_offers(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<OfferList>>> {
    let resp = offer_service::list_event_offers(&state, event_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/events/{event_id}/cart/quote",
    params(("event_id" = Uuid, Path, description = "Event ID")),
    request_body = QuoteRequest,
    responses(
        (status = 200, description = "Priced cart with the applied discount", body = ApiResponse<CartQuote>),
        (status = 404, description = "Coupon not valid"),
        (status = 422, description = "Invalid cart"),
    ),
    tag = "Cart"
)]
pub async fn quote_cart(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Json(payload): Json<QuoteRequest>,
) -> AppResult<Json<ApiResponse<CartQuote>>> {
    let resp = cart_service::quote(&state, event_id, payload).await?;
    Ok(Json(resp))
}
