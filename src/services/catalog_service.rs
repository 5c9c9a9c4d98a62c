use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::{
    domain::{Cart, CheckoutError, ResourceKind},
    dto::catalog::CatalogList,
    entity::resources::{Column as ResCol, Entity as Resources, Model as ResourceModel},
    error::AppResult,
    models::{CatalogEntry, Resource},
    response::{ApiResponse, Meta},
    services::inventory_service,
    state::AppState,
};

/// Every resource of the event with what is left of its allotment.
pub async fn list_catalog(state: &AppState, event_id: Uuid) -> AppResult<ApiResponse<CatalogList>> {
    let rows = Resources::find()
        .filter(ResCol::EventId.eq(event_id))
        .order_by_asc(ResCol::Kind)
        .order_by_asc(ResCol::Name)
        .all(&state.orm)
        .await?;

    let ledger =
        inventory_service::load_ledger(&state.orm, &rows, state.policy, Utc::now(), None).await?;

    let items: Vec<CatalogEntry> = rows
        .into_iter()
        .map(|row| CatalogEntry {
            remaining: ledger.remaining(row.id).ok().flatten(),
            resource: resource_from_entity(row),
        })
        .collect();

    let total = items.len() as i64;
    Ok(ApiResponse::success(
        "Catalog",
        CatalogList { items },
        Some(Meta::single_page(total)),
    ))
}

/// Unlocked read of the event's rows for `inventory_ids`.
pub(crate) async fn rows_for<C: ConnectionTrait>(
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
        .all(conn)
        .await
}

pub(crate) fn index_rows(rows: &[ResourceModel]) -> HashMap<Uuid, &ResourceModel> {
    rows.iter().map(|row| (row.id, row)).collect()
}

/// Lines must be sold as the type their catalog row is. Room types and booth
/// slots are only sold as a sub-selection of the hotel or booth that owns
/// them, so offers targeting the owner see it as the line's resource.
/// Lines without a row are left to the caller.
pub(crate) fn check_cart_shape(
    cart: &Cart,
    rows: &HashMap<Uuid, &ResourceModel>,
) -> Result<(), CheckoutError> {
    for line in cart.lines() {
        let item = &line.item;
        let Some(row) = rows.get(&item.inventory_id()) else {
            continue;
        };
        if row.kind.product_type() != item.resource_type {
            return Err(CheckoutError::Validation(format!(
                "resource {} cannot be sold as {:?}",
                row.id, item.resource_type
            )));
        }
        let owned = matches!(row.kind, ResourceKind::HotelRoomType | ResourceKind::BoothSubType);
        match item.sub_selection_id {
            None if owned => {
                return Err(CheckoutError::Validation(format!(
                    "resource {} must be selected under its hotel or booth",
                    row.id
                )));
            }
            Some(_) if row.parent_id != Some(item.resource_id) => {
                return Err(CheckoutError::Validation(format!(
                    "selection {} does not belong to resource {}",
                    row.id, item.resource_id
                )));
            }
            _ => {}
        }
    }
    Ok(())
}

/// Take current prices and names from `rows`; lines without a row keep theirs.
pub(crate) fn reprice_from_rows(cart: &mut Cart, rows: &HashMap<Uuid, &ResourceModel>) {
    cart.reprice(|item| {
        rows.get(&item.inventory_id())
            .map(|row| (row.unit_price, row.name.clone()))
    });
}

pub(crate) fn resource_from_entity(model: ResourceModel) -> Resource {
    Resource {
        id: model.id,
        event_id: model.event_id,
        kind: model.kind,
        product_type: model.kind.product_type(),
        parent_id: model.parent_id,
        name: model.name,
        image: model.image,
        unit_price: model.unit_price,
        allotted_quantity: model.allotted_quantity,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
