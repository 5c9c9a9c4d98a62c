use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Catalog variant of a purchasable resource.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    #[sea_orm(string_value = "ticket")]
    Ticket,
    #[sea_orm(string_value = "booth")]
    Booth,
    #[sea_orm(string_value = "booth_sub_type")]
    BoothSubType,
    #[sea_orm(string_value = "sponsor_package")]
    SponsorPackage,
    #[sea_orm(string_value = "hotel_room_type")]
    HotelRoomType,
}

impl ResourceKind {
    /// The cart line type a resource of this kind is sold as.
    pub fn product_type(self) -> ProductType {
        match self {
            ResourceKind::Ticket => ProductType::Ticket,
            ResourceKind::Booth | ResourceKind::BoothSubType => ProductType::Booth,
            ResourceKind::SponsorPackage => ProductType::Sponsor,
            ResourceKind::HotelRoomType => ProductType::Hotel,
        }
    }
}

/// Type of a cart line / order item.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum ProductType {
    #[sea_orm(string_value = "ticket")]
    Ticket,
    #[sea_orm(string_value = "booth")]
    Booth,
    #[sea_orm(string_value = "sponsor")]
    Sponsor,
    #[sea_orm(string_value = "hotel")]
    Hotel,
}

/// Lifecycle of a placed order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "failed")]
    Failed,
    #[sea_orm(string_value = "refunded")]
    Refunded,
}

impl OrderStatus {
    /// Pending settles to Completed or Failed; only Completed can be refunded.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Pending, OrderStatus::Completed)
                | (OrderStatus::Pending, OrderStatus::Failed)
                | (OrderStatus::Completed, OrderStatus::Refunded)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Completed => "completed",
            OrderStatus::Failed => "failed",
            OrderStatus::Refunded => "refunded",
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind {
    #[sea_orm(string_value = "fixed")]
    Fixed,
    #[sea_orm(string_value = "percentage")]
    Percentage,
}

/// Which cart lines a promotional offer applies to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum OfferScope {
    #[sea_orm(string_value = "all")]
    All,
    #[sea_orm(string_value = "hotels")]
    Hotels,
    #[sea_orm(string_value = "tickets")]
    Tickets,
    #[sea_orm(string_value = "sponsors")]
    Sponsors,
    #[sea_orm(string_value = "booths")]
    Booths,
    #[sea_orm(string_value = "custom")]
    Custom,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[sea_orm(string_value = "card")]
    Card,
    #[sea_orm(string_value = "bank_transfer")]
    BankTransfer,
    #[sea_orm(string_value = "invoice")]
    Invoice,
}

impl PaymentMethod {
    /// Settled outside the platform; an admin confirms receipt later.
    pub fn is_offline(self) -> bool {
        matches!(self, PaymentMethod::BankTransfer | PaymentMethod::Invoice)
    }
}
