use chrono::Utc;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit,
    domain::{LineFailure, OrderStatus},
    dto::orders::{OrderList, OrderWithItems, UpdateOrderStatusRequest},
    entity::orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::Order,
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    services::{
        inventory_service,
        order_service::{cart_from_items, items_for_order, order_from_entity, order_item_from_entity},
    },
    state::AppState,
};

pub async fn list_all_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = query.pagination().normalize();

    let mut condition = Condition::all();
    if let Some(company_id) = query.company_id {
        condition = condition.add(OrderCol::CompanyId.eq(company_id));
    }
    if let Some(status) = query.status {
        condition = condition.add(OrderCol::Status.eq(status));
    }

    let mut finder = Orders::find().filter(condition);
    finder = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(OrderCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(OrderCol::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await? as i64;
    let orders = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Orders",
        OrderList { items: orders },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn get_order_admin(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderWithItems>> {
    ensure_admin(user)?;
    let order = Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let items = items_for_order(&state.orm, order.id)
        .await?
        .into_iter()
        .map(order_item_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Order found",
        OrderWithItems {
            order: order_from_entity(order),
            items,
        },
        Some(Meta::empty()),
    ))
}

/// Move an order along its lifecycle.
///
/// Completing a pending order checks its lines against the allotments again,
/// leaving the order itself out of the commitments. An order whose hold ran out
/// and whose inventory went to someone else is marked failed instead.
pub async fn update_order_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    ensure_admin(user)?;
    let requested = payload.status;
    let now = Utc::now();

    let txn = state.orm.begin().await?;
    let existing = Orders::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    let previous = existing.status;
    if !previous.can_transition_to(requested) {
        return Err(AppError::BadRequest(format!(
            "Cannot move order from {} to {}",
            previous.as_str(),
            requested.as_str()
        )));
    }

    let mut shortage: Option<Vec<LineFailure>> = None;
    if requested == OrderStatus::Completed {
        let items = items_for_order(&txn, existing.id).await?;
        let cart = cart_from_items(existing.event_id, &items);

        let rows =
            inventory_service::lock_resources(&txn, existing.event_id, &cart.inventory_ids())
                .await?;
        let mut ledger =
            inventory_service::load_ledger(&txn, &rows, state.policy, now, Some(existing.id))
                .await?;
        if let Err(failures) = ledger.reserve_cart(&cart) {
            shortage = Some(failures);
        }
    }

    let status = if shortage.is_some() {
        OrderStatus::Failed
    } else {
        requested
    };

    let mut active: OrderActive = existing.into();
    active.status = Set(status);
    if status == OrderStatus::Completed {
        active.paid_at = Set(Some(now.into()));
    }
    active.updated_at = Set(now.into());
    let order = active.update(&txn).await?;
    txn.commit().await?;

    tracing::info!(
        order_id = %order.id,
        from = previous.as_str(),
        to = status.as_str(),
        "order status changed"
    );
    audit::record(
        &state.pool,
        Some(user.user_id),
        "order_status_update",
        Some("orders"),
        Some(serde_json::json!({
            "order_id": order.id,
            "from": previous.as_str(),
            "to": status.as_str(),
        })),
    )
    .await;

    if let Some(failures) = shortage {
        return Err(AppError::InsufficientInventory(failures));
    }

    Ok(ApiResponse::success(
        "Order updated",
        order_from_entity(order),
        Some(Meta::empty()),
    ))
}
