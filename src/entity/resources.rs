use sea_orm::entity::prelude::*;

use crate::domain::ResourceKind;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "resources")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub event_id: Uuid,
    pub kind: ResourceKind,
    /// Owning booth of a booth sub-type, owning hotel of a room type.
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub image: Option<String>,
    pub unit_price: i64,
    /// `None` means unlimited.
    pub allotted_quantity: Option<i32>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::order_items::Entity")]
    OrderItems,
}

impl Related<super::order_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
