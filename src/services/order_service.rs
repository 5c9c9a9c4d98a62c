use chrono::Utc;
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use uuid::Uuid;

use crate::{
    domain::{Cart, CartItem, CartLine},
    dto::orders::{OrderList, OrderWithItems},
    entity::{
        order_items::{Column as OrderItemCol, Entity as OrderItems, Model as OrderItemModel},
        orders::{Column as OrderCol, Entity as Orders, Model as OrderModel},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Order, OrderItem},
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    services::company_service,
    state::AppState,
};

/// Orders of one company, or of every company the caller belongs to.
pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let (page, limit, offset) = query.pagination().normalize();

    let mut condition = Condition::all();
    match query.company_id {
        Some(company_id) => {
            company_service::ensure_member(state, user, company_id).await?;
            condition = condition.add(OrderCol::CompanyId.eq(company_id));
        }
        None if user.is_admin() => {}
        None => {
            let companies = company_service::member_company_ids(state, user).await?;
            condition = condition.add(OrderCol::CompanyId.is_in(companies));
        }
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
        "Ok",
        OrderList { items: orders },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn get_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let order = Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    // Non-members get the same answer as for a missing order.
    if company_service::ensure_member(state, user, order.company_id)
        .await
        .is_err()
    {
        return Err(AppError::NotFound);
    }

    let items = items_for_order(&state.orm, order.id)
        .await?
        .into_iter()
        .map(order_item_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "OK",
        OrderWithItems {
            order: order_from_entity(order),
            items,
        },
        Some(Meta::empty()),
    ))
}

pub(crate) async fn items_for_order<C: ConnectionTrait>(
    conn: &C,
    order_id: Uuid,
) -> Result<Vec<OrderItemModel>, DbErr> {
    OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order_id))
        .order_by_asc(OrderItemCol::CreatedAt)
        .all(conn)
        .await
}

/// Rebuild the cart an order was placed from, at the prices it was placed at.
pub(crate) fn cart_from_items(event_id: Uuid, items: &[OrderItemModel]) -> Cart {
    let lines: Vec<CartLine> = items
        .iter()
        .map(|item| CartLine {
            item: CartItem {
                resource_id: item.product_id,
                resource_type: item.product_type,
                unit_price: item.unit_price,
                sub_selection_id: item.sub_selection_id,
                name: item.name.clone(),
                image: None,
            },
            quantity: u32::try_from(item.quantity).unwrap_or(0),
        })
        .collect();
    Cart::from_lines(event_id, lines)
}

pub(crate) fn order_from_entity(model: OrderModel) -> Order {
    Order {
        id: model.id,
        company_id: model.company_id,
        event_id: model.event_id,
        placed_by: model.placed_by,
        status: model.status,
        subtotal_amount: model.subtotal_amount,
        discount_amount: model.discount_amount,
        total_amount: model.total_amount,
        coupon_code: model.coupon_code,
        offer_id: model.offer_id,
        payment_method: model.payment_method,
        offline_payment: model.offline_payment,
        billing: model.billing,
        invoice_number: model.invoice_number,
        paid_at: model.paid_at.map(|dt| dt.with_timezone(&Utc)),
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

pub(crate) fn order_item_from_entity(model: OrderItemModel) -> OrderItem {
    OrderItem {
        id: model.id,
        order_id: model.order_id,
        product_id: model.product_id,
        sub_selection_id: model.sub_selection_id,
        product_type: model.product_type,
        quantity: model.quantity,
        unit_price: model.unit_price,
        name: model.name,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

pub(crate) fn build_invoice_number(order_id: Uuid) -> String {
    let date = Utc::now().format("%Y%m%d");
    let suffix = order_id.simple().to_string();
    format!("INV-{}-{}", date, &suffix[..8])
}
