use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::{CartLine, Resolution};

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CouponInput {
    pub code: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct QuoteRequest {
    #[validate(nested)]
    pub cart_items: Vec<CartLine>,
    #[serde(default)]
    pub coupon: Option<CouponInput>,
}

/// Priced cart. Lines are merged by `(resource_id, sub_selection_id)`.
#[derive(Debug, Serialize, ToSchema)]
pub struct CartQuote {
    pub lines: Vec<CartLine>,
    /// Lines with no row in the event catalog. They are left out of the pricing.
    pub unknown_lines: Vec<CartLine>,
    #[serde(flatten)]
    pub pricing: Resolution,
}
