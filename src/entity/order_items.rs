use sea_orm::entity::prelude::*;

use crate::domain::ProductType;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "order_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub order_id: Uuid,
    /// Resource the buyer selected (ticket, booth, sponsor package, hotel).
    pub product_id: Uuid,
    pub sub_selection_id: Option<Uuid>,
    /// Catalog row whose allotment this item consumes.
    pub inventory_id: Uuid,
    pub product_type: ProductType,
    pub quantity: i32,
    pub unit_price: i64,
    pub name: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::orders::Entity",
        from = "Column::OrderId",
        to = "super::orders::Column::Id"
    )]
    Orders,
    #[sea_orm(
        belongs_to = "super::resources::Entity",
        from = "Column::InventoryId",
        to = "super::resources::Column::Id"
    )]
    Resources,
}

impl Related<super::orders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl Related<super::resources::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Resources.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
