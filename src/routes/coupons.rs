use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};

use crate::{
    domain::Discount,
    dto::coupons::ApplyCouponRequest,
    error::AppResult,
    response::ApiResponse,
    services::coupon_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/apply", get(lookup_coupon).post(apply_coupon))
}

#[utoipa::path(
    post,
    path = "/api/coupons/apply",
    request_body = ApplyCouponRequest,
    responses(
        (status = 200, description = "Discount behind the code", body = ApiResponse<Discount>),
        (status = 404, description = "Coupon not valid"),
    ),
    tag = "Coupons"
)]
pub async fn apply_coupon(
    State(state): State<AppState>,
    Json(payload): Json<ApplyCouponRequest>,
) -> AppResult<Json<ApiResponse<Discount>>> {
    let resp = coupon_service::apply_coupon(&state, &payload.code).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/coupons/apply",
    params(ApplyCouponRequest),
    responses(
        (status = 200, description = "Discount behind the code", body = ApiResponse<Discount>),
        (status = 404, description = "Coupon not valid"),
    ),
    tag = "Coupons"
)]
pub async fn lookup_coupon(
    State(state): State<AppState>,
    Query(query): Query<ApplyCouponRequest>,
) -> AppResult<Json<ApiResponse<Discount>>> {
    let resp = coupon_service::apply_coupon(&state, &query.code).await?;
    Ok(Json(resp))
}
