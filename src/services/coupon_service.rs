use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    audit,
    domain::{Discount, discount::Coupon},
    dto::coupons::{CouponList, CreateCouponRequest, UpdateCouponRequest},
    entity::coupons::{ActiveModel, Column, Entity as Coupons, Model as CouponModel},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
};

async fn find_by_code<C: ConnectionTrait>(conn: &C, code: &str) -> Result<Vec<CouponModel>, DbErr> {
    Coupons::find()
        .filter(Expr::expr(Func::lower(Expr::col(Column::Code))).eq(code.trim().to_lowercase()))
        .all(conn)
        .await
}

/// Coupons stored under `code`, compared case-insensitively.
pub async fn coupons_for_code<C: ConnectionTrait>(
    conn: &C,
    code: Option<&str>,
) -> Result<Vec<Coupon>, DbErr> {
    let Some(code) = code.map(str::trim).filter(|c| !c.is_empty()) else {
        return Ok(Vec::new());
    };
    let rows = find_by_code(conn, code).await?;
    Ok(rows.into_iter().filter_map(coupon_to_domain).collect())
}

fn coupon_to_domain(model: CouponModel) -> Option<Coupon> {
    match Discount::from_parts(model.discount_kind, model.discount_value) {
        Ok(discount) => Some(Coupon {
            code: model.code,
            discount,
            is_active: model.is_active,
        }),
        Err(err) => {
            tracing::warn!(coupon_id = %model.id, error = %err, "stored coupon is invalid");
            None
        }
    }
}

/// Resolve a code to its discount descriptor without touching any cart.
pub async fn apply_coupon(state: &AppState, code: &str) -> AppResult<ApiResponse<Discount>> {
    let coupon = coupons_for_code(&state.orm, Some(code))
        .await?
        .into_iter()
        .find(|coupon| coupon.is_active)
        .ok_or_else(|| AppError::InvalidCoupon(code.trim().to_string()))?;

    Ok(ApiResponse::success(
        "Coupon applied",
        coupon.discount,
        Some(Meta::empty()),
    ))
}

pub async fn list_coupons(
    state: &AppState,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<CouponList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = pagination.normalize();

    let finder = Coupons::find().order_by_desc(Column::CreatedAt);
    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(coupon_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Coupons",
        CouponList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn create_coupon(
    state: &AppState,
    user: &AuthUser,
    payload: CreateCouponRequest,
) -> AppResult<ApiResponse<models::Coupon>> {
    ensure_admin(user)?;
    payload.validate()?;
    let discount = Discount::from_parts(payload.discount_type, payload.discount_value)?;
    let code = payload.code.trim().to_string();
    ensure_code_free(state, &code, None).await?;

    let coupon = ActiveModel {
        id: Set(Uuid::new_v4()),
        code: Set(code),
        discount_kind: Set(discount.kind()),
        discount_value: Set(discount.value()),
        is_active: Set(payload.is_active.unwrap_or(true)),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        &state.pool,
        Some(user.user_id),
        "coupon_create",
        Some("coupons"),
        Some(serde_json::json!({ "coupon_id": coupon.id, "code": coupon.code })),
    )
    .await;

    Ok(ApiResponse::success(
        "Coupon created",
        coupon_from_entity(coupon),
        Some(Meta::empty()),
    ))
}

pub async fn update_coupon(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateCouponRequest,
) -> AppResult<ApiResponse<models::Coupon>> {
    ensure_admin(user)?;
    payload.validate()?;
    let existing = Coupons::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let kind = payload.discount_type.unwrap_or(existing.discount_kind);
    let value = payload.discount_value.unwrap_or(existing.discount_value);
    let discount = Discount::from_parts(kind, value)?;

    let mut active: ActiveModel = existing.into();
    if let Some(code) = payload.code {
        let code = code.trim().to_string();
        ensure_code_free(state, &code, Some(id)).await?;
        active.code = Set(code);
    }
    if let Some(is_active) = payload.is_active {
        active.is_active = Set(is_active);
    }
    active.discount_kind = Set(discount.kind());
    active.discount_value = Set(discount.value());
    active.updated_at = Set(Utc::now().into());
    let coupon = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        Some(user.user_id),
        "coupon_update",
        Some("coupons"),
        Some(serde_json::json!({ "coupon_id": coupon.id })),
    )
    .await;

    Ok(ApiResponse::success(
        "Coupon updated",
        coupon_from_entity(coupon),
        Some(Meta::empty()),
    ))
}

pub async fn delete_coupon(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let result = Coupons::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        &state.pool,
        Some(user.user_id),
        "coupon_delete",
        Some("coupons"),
        Some(serde_json::json!({ "coupon_id": id })),
    )
    .await;

    Ok(ApiResponse::success(
        "Coupon deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

async fn ensure_code_free(state: &AppState, code: &str, except: Option<Uuid>) -> AppResult<()> {
    let taken = find_by_code(&state.orm, code)
        .await?
        .into_iter()
        .any(|coupon| Some(coupon.id) != except);
    if taken {
        return Err(AppError::BadRequest(format!("coupon code {code} already exists")));
    }
    Ok(())
}

fn coupon_from_entity(model: CouponModel) -> models::Coupon {
    models::Coupon {
        id: model.id,
        code: model.code,
        discount_type: model.discount_kind,
        discount_value: model.discount_value,
        is_active: model.is_active,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}
