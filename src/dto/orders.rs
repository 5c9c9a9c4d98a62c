use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    domain::{CartLine, OrderStatus, PaymentMethod, checkout::AccountDetails},
    dto::cart::CouponInput,
    models::{Order, OrderItem},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CheckoutRequest {
    pub company_id: Uuid,
    pub event_id: Uuid,
    pub account_details: AccountDetails,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub accepted_terms: bool,
    #[serde(default)]
    pub accepted_policies: bool,
    #[serde(default)]
    pub coupon: Option<CouponInput>,
    #[validate(nested)]
    pub cart_items: Vec<CartLine>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderWithItems {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<Order>,
}
