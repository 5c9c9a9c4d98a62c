use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, LockType};
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, FromQueryResult, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait,
};
use uuid::Uuid;

use crate::{
    domain::{CountPolicy, Ledger, OrderStatus},
    entity::{
        order_items::{self, Column as OrderItemCol, Entity as OrderItems},
        orders::Column as OrderCol,
        resources::{Column as ResCol, Entity as Resources, Model as ResourceModel},
    },
};

#[derive(Debug, FromQueryResult)]
struct CommittedRow {
    inventory_id: Uuid,
    committed: i64,
}

/// Sum of ordered quantities per inventory row, over the orders `policy` counts.
pub async fn committed_quantities<C: ConnectionTrait>(
    conn: &C,
    inventory_ids: &[Uuid],
    policy: CountPolicy,
    now: DateTime<Utc>,
    exclude_order: Option<Uuid>,
) -> Result<HashMap<Uuid, i64>, DbErr> {
    if inventory_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let mut counted = Condition::any().add(OrderCol::Status.eq(OrderStatus::Completed));
    if let Some(cutoff) = policy.pending_cutoff(now) {
        counted = counted.add(
            Condition::all()
                .add(OrderCol::Status.eq(OrderStatus::Pending))
                .add(OrderCol::CreatedAt.gt(cutoff)),
        );
    }

    let mut condition = Condition::all()
        .add(OrderItemCol::InventoryId.is_in(inventory_ids.iter().copied()))
        .add(counted);
    if let Some(order_id) = exclude_order {
        condition = condition.add(OrderCol::Id.ne(order_id));
    }

    let rows = OrderItems::find()
        .select_only()
        .column(OrderItemCol::InventoryId)
        .column_as(
            Expr::col((OrderItems, OrderItemCol::Quantity)).sum(),
            "committed",
        )
        .join(JoinType::InnerJoin, order_items::Relation::Orders.def())
        .filter(condition)
        .group_by(OrderItemCol::InventoryId)
        .into_model::<CommittedRow>()
        .all(conn)
        .await?;

    Ok(rows
        .into_iter()
        .map(|row| (row.inventory_id, row.committed))
        .collect())
}

/// Build a ledger over `rows` with their current commitments.
pub async fn load_ledger<C: ConnectionTrait>(
    conn: &C,
    rows: &[ResourceModel],
    policy: CountPolicy,
    now: DateTime<Utc>,
    exclude_order: Option<Uuid>,
) -> Result<Ledger, DbErr> {
    let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
    let committed = committed_quantities(conn, &ids, policy, now, exclude_order).await?;

    let mut ledger = Ledger::new();
    for row in rows {
        ledger.track(
            row.id,
            row.allotted_quantity.map(i64::from),
            committed.get(&row.id).copied().unwrap_or(0),
        );
    }
    Ok(ledger)
}

/// Lock the event's inventory rows `FOR UPDATE`, in id order so concurrent
/// checkouts over overlapping rows cannot deadlock.
pub async fn lock_resources<C: ConnectionTrait>(
    conn: &C,
    event_id: Uuid,
    inventory_ids: &[Uuid],
) -> Result<Vec<ResourceModel>, DbErr> {
    if inventory_ids.is_empty() {
        return Ok(Vec::new());
    }
    Resources::find()
        .filter(ResCol::EventId.eq(event_id))
        .filter(ResCol::Id.is_in(inventory_ids.iter().copied()))
        .order_by_asc(ResCol::Id)
        .lock(LockType::Update)
        .all(conn)
        .await
}
