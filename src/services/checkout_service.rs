use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, DbErr, RuntimeErr, Set, TransactionTrait};
use uuid::Uuid;
use validator::Validate;

use crate::{
    audit,
    domain::{
        Cart, CheckoutError, CheckoutSession, CheckoutSubmission, DiscountSource, OrderStatus,
        discount::{self, Coupon, PromotionalOffer},
    },
    dto::orders::{CheckoutRequest, OrderWithItems},
    entity::{order_items::ActiveModel as OrderItemActive, orders::ActiveModel as OrderActive},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    response::{ApiResponse, Meta},
    services::{
        catalog_service, company_service, coupon_service, inventory_service, offer_service,
        order_service::{build_invoice_number, order_from_entity, order_item_from_entity},
    },
    state::AppState,
};

/// A conflicting transaction is retried once before the failure is surfaced.
const MAX_ATTEMPTS: u32 = 2;

/// Turn a cart into an order, all lines or none.
pub async fn checkout(
    state: &AppState,
    user: &AuthUser,
    payload: CheckoutRequest,
) -> AppResult<ApiResponse<OrderWithItems>> {
    company_service::ensure_member(state, user, payload.company_id).await?;
    payload.validate()?;

    let company_id = payload.company_id;
    let event_id = payload.event_id;
    let code = payload
        .coupon
        .map(|coupon| coupon.code.trim().to_string())
        .filter(|code| !code.is_empty());

    let mut cart = Cart::from_lines(event_id, payload.cart_items);
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart.into());
    }

    // Client prices are only a snapshot.
    let rows = catalog_service::rows_for(&state.orm, event_id, &cart.inventory_ids()).await?;
    let by_id = catalog_service::index_rows(&rows);
    catalog_service::check_cart_shape(&cart, &by_id)?;
    catalog_service::reprice_from_rows(&mut cart, &by_id);

    let coupons = coupon_service::coupons_for_code(&state.orm, code.as_deref()).await?;
    let offers = offer_service::offers_for_event(&state.orm, event_id).await?;
    let preview = discount::resolve(&cart, code.as_deref(), &coupons, &offers, Utc::now())
        .map_err(CheckoutError::from)?;

    let mut session = CheckoutSession::new(cart);
    session.review(code, preview)?;
    session.enter_account_details(payload.account_details)?;
    session.select_payment(
        payload.payment_method,
        payload.accepted_terms,
        payload.accepted_policies,
    )?;
    let submission = session.submit()?;

    let (submission, coupons, offers) = (&submission, &coupons, &offers);
    let outcome = retry_transient(move || {
        persist_order(state, user, company_id, submission, coupons, offers)
    })
    .await;

    match outcome {
        Ok(created) => {
            session.complete(created.order.id)?;
            tracing::info!(
                order_id = %created.order.id,
                %company_id,
                %event_id,
                total = created.order.total_amount,
                status = created.order.status.as_str(),
                "order created"
            );
            audit::record(
                &state.pool,
                Some(user.user_id),
                "checkout",
                Some("orders"),
                Some(serde_json::json!({
                    "order_id": created.order.id,
                    "company_id": company_id,
                    "total_amount": created.order.total_amount,
                })),
            )
            .await;
            Ok(ApiResponse::success(
                "Checkout success",
                created,
                Some(Meta::empty()),
            ))
        }
        Err(err) => {
            session.fail(err.to_string())?;
            tracing::warn!(%company_id, %event_id, error = %err, "checkout failed");
            Err(err)
        }
    }
}

/// One transaction: lock the inventory rows, reprice from the catalog,
/// re-resolve the discount, reserve every line, then write the order.
async fn persist_order(
    state: &AppState,
    user: &AuthUser,
    company_id: Uuid,
    submission: &CheckoutSubmission,
    coupons: &[Coupon],
    offers: &[PromotionalOffer],
) -> AppResult<OrderWithItems> {
    let now = Utc::now();
    let mut cart = submission.cart.clone();
    let event_id = cart.event_id();

    let txn = state.orm.begin().await?;
    let rows = inventory_service::lock_resources(&txn, event_id, &cart.inventory_ids()).await?;
    let by_id = catalog_service::index_rows(&rows);

    catalog_service::check_cart_shape(&cart, &by_id)?;
    catalog_service::reprice_from_rows(&mut cart, &by_id);

    let pricing = discount::resolve(
        &cart,
        submission.coupon_code.as_deref(),
        coupons,
        offers,
        now,
    )
    .map_err(CheckoutError::from)?;

    let mut ledger = inventory_service::load_ledger(&txn, &rows, state.policy, now, None).await?;
    if let Err(failures) = ledger.reserve_cart(&cart) {
        txn.rollback().await?;
        return Err(CheckoutError::InsufficientInventory(failures).into());
    }

    // Nothing to collect: no payment confirmation will ever arrive.
    let status = if pricing.total == 0 {
        OrderStatus::Completed
    } else {
        OrderStatus::Pending
    };
    let (coupon_code, offer_id) = match &pricing.applied {
        DiscountSource::Coupon { code, .. } => (Some(code.clone()), None),
        DiscountSource::Offer { offer_id, .. } => (None, Some(*offer_id)),
        DiscountSource::None => (None, None),
    };
    let billing = serde_json::to_value(&submission.account)
        .map_err(|err| AppError::Internal(err.into()))?;

    let order_id = Uuid::new_v4();
    let order = OrderActive {
        id: Set(order_id),
        company_id: Set(company_id),
        event_id: Set(event_id),
        placed_by: Set(user.user_id),
        status: Set(status),
        subtotal_amount: Set(pricing.subtotal),
        discount_amount: Set(pricing.discount_amount),
        total_amount: Set(pricing.total),
        coupon_code: Set(coupon_code),
        offer_id: Set(offer_id),
        payment_method: Set(submission.payment_method),
        offline_payment: Set(submission.payment_method.is_offline()),
        billing: Set(billing),
        invoice_number: Set(build_invoice_number(order_id)),
        paid_at: Set((status == OrderStatus::Completed).then(|| now.into())),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&txn)
    .await?;

    let mut items = Vec::with_capacity(cart.lines().len());
    for line in cart.lines() {
        let quantity = i32::try_from(line.quantity)
            .map_err(|_| AppError::Validation(format!("quantity {} is too large", line.quantity)))?;
        let item = OrderItemActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.id),
            product_id: Set(line.item.resource_id),
            sub_selection_id: Set(line.item.sub_selection_id),
            inventory_id: Set(line.item.inventory_id()),
            product_type: Set(line.item.resource_type),
            quantity: Set(quantity),
            unit_price: Set(line.item.unit_price),
            name: Set(line.item.name.clone()),
            created_at: NotSet,
        }
        .insert(&txn)
        .await?;
        items.push(order_item_from_entity(item));
    }

    txn.commit().await?;

    Ok(OrderWithItems {
        order: order_from_entity(order),
        items,
    })
}

/// Run `op`, running it once more if it failed on a serialization failure or
/// deadlock.
pub async fn retry_transient<T, F, Fut>(mut op: F) -> AppResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = AppResult<T>>,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Err(AppError::OrmError(err)) if attempt < MAX_ATTEMPTS && is_transient(&err) => {
                tracing::warn!(attempt, error = %err, "checkout transaction conflicted, retrying");
                attempt += 1;
            }
            other => return other,
        }
    }
}

/// Serialization failures and deadlocks.
pub fn is_transient(err: &DbErr) -> bool {
    let runtime = match err {
        DbErr::Exec(runtime) | DbErr::Query(runtime) | DbErr::Conn(runtime) => runtime,
        _ => return false,
    };
    match runtime {
        RuntimeErr::SqlxError(sqlx::Error::Database(db)) => {
            matches!(db.code().as_deref(), Some("40001") | Some("40P01"))
        }
        _ => false,
    }
}
