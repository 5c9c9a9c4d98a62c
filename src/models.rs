use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{
    DiscountKind, OfferScope, OrderStatus, PaymentMethod, ProductType, ResourceKind,
    discount::CustomTargets,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Resource {
    pub id: Uuid,
    pub event_id: Uuid,
    pub kind: ResourceKind,
    pub product_type: ProductType,
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub image: Option<String>,
    pub unit_price: i64,
    pub allotted_quantity: Option<i32>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CatalogEntry {
    #[serde(flatten)]
    pub resource: Resource,
    /// `None` when unlimited.
    pub remaining: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Coupon {
    pub id: Uuid,
    pub code: String,
    pub discount_type: DiscountKind,
    pub discount_value: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PromotionalOffer {
    pub id: Uuid,
    pub event_id: Option<Uuid>,
    pub name: String,
    pub code: Option<String>,
    pub percentage: i32,
    pub scope: OfferScope,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub custom_targets: CustomTargets,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub company_id: Uuid,
    pub event_id: Uuid,
    pub placed_by: Uuid,
    pub status: OrderStatus,
    pub subtotal_amount: i64,
    pub discount_amount: i64,
    pub total_amount: i64,
    pub coupon_code: Option<String>,
    pub offer_id: Option<Uuid>,
    pub payment_method: PaymentMethod,
    pub offline_payment: bool,
    pub billing: serde_json::Value,
    pub invoice_number: String,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub sub_selection_id: Option<Uuid>,
    pub product_type: ProductType,
    pub quantity: i32,
    pub unit_price: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
