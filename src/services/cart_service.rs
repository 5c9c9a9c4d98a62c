use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    domain::{Cart, discount},
    dto::cart::{CartQuote, QuoteRequest},
    error::AppResult,
    response::{ApiResponse, Meta},
    services::{catalog_service, coupon_service, offer_service},
    state::AppState,
};

/// Price a client-held cart: merge its lines, refresh prices from the
/// catalog, then resolve the single applicable coupon or offer. Inventory is
/// not consulted.
pub async fn quote(
    state: &AppState,
    event_id: Uuid,
    payload: QuoteRequest,
) -> AppResult<ApiResponse<CartQuote>> {
    payload.validate()?;

    let mut cart = Cart::from_lines(event_id, payload.cart_items);
    let code = payload.coupon.map(|coupon| coupon.code);

    let rows = catalog_service::rows_for(&state.orm, event_id, &cart.inventory_ids()).await?;
    let by_id = catalog_service::index_rows(&rows);
    catalog_service::check_cart_shape(&cart, &by_id)?;

    let unknown_lines: Vec<_> = cart
        .lines()
        .iter()
        .filter(|line| !by_id.contains_key(&line.item.inventory_id()))
        .cloned()
        .collect();
    for line in &unknown_lines {
        cart.remove(line.item.resource_id, line.item.sub_selection_id);
    }
    catalog_service::reprice_from_rows(&mut cart, &by_id);

    let coupons = coupon_service::coupons_for_code(&state.orm, code.as_deref()).await?;
    let offers = offer_service::offers_for_event(&state.orm, event_id).await?;
    let pricing = discount::resolve(&cart, code.as_deref(), &coupons, &offers, Utc::now())?;

    tracing::debug!(
        %event_id,
        lines = cart.lines().len(),
        unknown = unknown_lines.len(),
        subtotal = pricing.subtotal,
        discount = pricing.discount_amount,
        "cart quoted"
    );

    Ok(ApiResponse::success(
        "Cart quote",
        CartQuote {
            lines: cart.lines().to_vec(),
            unknown_lines,
            pricing,
        },
        Some(Meta::empty()),
    ))
}
