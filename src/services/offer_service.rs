use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    audit,
    domain::{
        OfferScope,
        discount::{CustomTargets, PromotionalOffer},
    },
    dto::{
        catalog::OfferList,
        offers::{CreateOfferRequest, UpdateOfferRequest},
    },
    entity::promotional_offers::{ActiveModel, Column, Entity as Offers, Model as OfferModel},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
};

async fn active_offer_rows<C: ConnectionTrait>(
    conn: &C,
    event_id: Uuid,
) -> Result<Vec<OfferModel>, DbErr> {
    Offers::find()
        .filter(Column::IsActive.eq(true))
        .filter(
            Condition::any()
                .add(Column::EventId.eq(event_id))
                .add(Column::EventId.is_null()),
        )
        .order_by_asc(Column::CreatedAt)
        .all(conn)
        .await
}

/// Active offers attached to the event or to every event. Time windows are
/// left to the resolver so repeated quotes see a consistent clock.
pub async fn offers_for_event<C: ConnectionTrait>(
    conn: &C,
    event_id: Uuid,
) -> Result<Vec<PromotionalOffer>, DbErr> {
    let rows = active_offer_rows(conn, event_id).await?;
    Ok(rows.into_iter().map(offer_to_domain).collect())
}

/// Automatic offers running right now, for display next to the catalog.
pub async fn list_event_offers(
    state: &AppState,
    event_id: Uuid,
) -> AppResult<ApiResponse<OfferList>> {
    let now = Utc::now();
    let items: Vec<models::PromotionalOffer> = active_offer_rows(&state.orm, event_id)
        .await?
        .into_iter()
        .filter(|row| {
            let offer = offer_to_domain(row.clone());
            offer.code.is_none() && offer.eligibility(now).is_ok()
        })
        .map(offer_from_entity)
        .collect();

    let total = items.len() as i64;
    Ok(ApiResponse::success(
        "Offers",
        OfferList { items },
        Some(Meta::single_page(total)),
    ))
}

pub async fn list_offers(
    state: &AppState,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<OfferList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = pagination.normalize();

    let finder = Offers::find().order_by_desc(Column::CreatedAt);
    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(offer_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Offers",
        OfferList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn create_offer(
    state: &AppState,
    user: &AuthUser,
    payload: CreateOfferRequest,
) -> AppResult<ApiResponse<models::PromotionalOffer>> {
    ensure_admin(user)?;
    payload.validate()?;
    let targets = payload.custom_targets.unwrap_or_default();
    validate_offer(payload.scope, &targets, payload.starts_at, payload.ends_at)?;

    let offer = ActiveModel {
        id: Set(Uuid::new_v4()),
        event_id: Set(payload.event_id),
        name: Set(payload.name),
        code: Set(normalize_code(payload.code)),
        percentage: Set(payload.percentage),
        scope: Set(payload.scope),
        starts_at: Set(payload.starts_at.map(Into::into)),
        ends_at: Set(payload.ends_at.map(Into::into)),
        is_active: Set(payload.is_active.unwrap_or(true)),
        custom_targets: Set(targets_to_json(&targets)?),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        &state.pool,
        Some(user.user_id),
        "offer_create",
        Some("promotional_offers"),
        Some(serde_json::json!({ "offer_id": offer.id })),
    )
    .await;

    Ok(ApiResponse::success(
        "Offer created",
        offer_from_entity(offer),
        Some(Meta::empty()),
    ))
}

pub async fn update_offer(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateOfferRequest,
) -> AppResult<ApiResponse<models::PromotionalOffer>> {
    ensure_admin(user)?;
    payload.validate()?;
    let existing = Offers::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let current = offer_to_domain(existing.clone());
    let scope = payload.scope.unwrap_or(current.scope);
    let targets = payload.custom_targets.unwrap_or(current.targets);
    let starts_at = payload.starts_at.or(current.starts_at);
    let ends_at = payload.ends_at.or(current.ends_at);
    validate_offer(scope, &targets, starts_at, ends_at)?;

    let mut active: ActiveModel = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if payload.code.is_some() {
        active.code = Set(normalize_code(payload.code));
    }
    if let Some(percentage) = payload.percentage {
        active.percentage = Set(percentage);
    }
    if let Some(is_active) = payload.is_active {
        active.is_active = Set(is_active);
    }
    active.scope = Set(scope);
    active.custom_targets = Set(targets_to_json(&targets)?);
    active.starts_at = Set(starts_at.map(Into::into));
    active.ends_at = Set(ends_at.map(Into::into));
    active.updated_at = Set(Utc::now().into());
    let offer = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        Some(user.user_id),
        "offer_update",
        Some("promotional_offers"),
        Some(serde_json::json!({ "offer_id": offer.id })),
    )
    .await;

    Ok(ApiResponse::success(
        "Offer updated",
        offer_from_entity(offer),
        Some(Meta::empty()),
    ))
}

pub async fn delete_offer(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let result = Offers::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        &state.pool,
        Some(user.user_id),
        "offer_delete",
        Some("promotional_offers"),
        Some(serde_json::json!({ "offer_id": id })),
    )
    .await;

    Ok(ApiResponse::success(
        "Offer deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

fn validate_offer(
    scope: OfferScope,
    targets: &CustomTargets,
    starts_at: Option<chrono::DateTime<Utc>>,
    ends_at: Option<chrono::DateTime<Utc>>,
) -> AppResult<()> {
    if scope == OfferScope::Custom && targets.is_empty() {
        return Err(AppError::Validation(
            "custom offers need at least one target".into(),
        ));
    }
    if let (Some(start), Some(end)) = (starts_at, ends_at) {
        if start > end {
            return Err(AppError::Validation("offer ends before it starts".into()));
        }
    }
    Ok(())
}

fn normalize_code(code: Option<String>) -> Option<String> {
    code.map(|c| c.trim().to_string()).filter(|c| !c.is_empty())
}

fn targets_to_json(targets: &CustomTargets) -> AppResult<serde_json::Value> {
    serde_json::to_value(targets).map_err(|err| AppError::Internal(err.into()))
}

fn targets_from_json(model: &OfferModel) -> CustomTargets {
    serde_json::from_value(model.custom_targets.clone()).unwrap_or_else(|err| {
        tracing::warn!(offer_id = %model.id, error = %err, "offer targets are malformed");
        CustomTargets::default()
    })
}

pub(crate) fn offer_to_domain(model: OfferModel) -> PromotionalOffer {
    let targets = targets_from_json(&model);
    PromotionalOffer {
        id: model.id,
        name: model.name,
        code: model.code,
        percentage: model.percentage,
        scope: model.scope,
        starts_at: model.starts_at.map(|dt| dt.with_timezone(&Utc)),
        ends_at: model.ends_at.map(|dt| dt.with_timezone(&Utc)),
        is_active: model.is_active,
        targets,
    }
}

fn offer_from_entity(model: OfferModel) -> models::PromotionalOffer {
    let custom_targets = targets_from_json(&model);
    models::PromotionalOffer {
        id: model.id,
        event_id: model.event_id,
        name: model.name,
        code: model.code,
        percentage: model.percentage,
        scope: model.scope,
        starts_at: model.starts_at.map(|dt| dt.with_timezone(&Utc)),
        ends_at: model.ends_at.map(|dt| dt.with_timezone(&Utc)),
        is_active: model.is_active,
        custom_targets,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}
