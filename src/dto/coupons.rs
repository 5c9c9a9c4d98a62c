use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{domain::DiscountKind, models::Coupon};

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ApplyCouponRequest {
    pub code: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCouponRequest {
    #[validate(length(min = 3, max = 64, message = "code must be 3 to 64 characters"))]
    pub code: String,
    pub discount_type: DiscountKind,
    pub discount_value: i64,
    #[serde(default)]
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCouponRequest {
    #[validate(length(min = 3, max = 64, message = "code must be 3 to 64 characters"))]
    pub code: Option<String>,
    pub discount_type: Option<DiscountKind>,
    pub discount_value: Option<i64>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CouponList {
    pub items: Vec<Coupon>,
}
