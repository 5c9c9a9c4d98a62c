use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QuerySelect};
use uuid::Uuid;

use crate::{
    domain::checkout::{AccountDetails, BillingAddress},
    entity::{
        companies::{Entity as Companies, Model as CompanyModel},
        company_members::{Column as MemberCol, Entity as CompanyMembers},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Admins act for any company; everyone else must be a member.
pub async fn ensure_member(state: &AppState, user: &AuthUser, company_id: Uuid) -> AppResult<()> {
    if user.is_admin() {
        return Ok(());
    }
    let membership = CompanyMembers::find()
        .filter(MemberCol::CompanyId.eq(company_id))
        .filter(MemberCol::UserId.eq(user.user_id))
        .one(&state.orm)
        .await?;
    if membership.is_none() {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

pub async fn member_company_ids(state: &AppState, user: &AuthUser) -> AppResult<Vec<Uuid>> {
    let ids = CompanyMembers::find()
        .select_only()
        .column(MemberCol::CompanyId)
        .filter(MemberCol::UserId.eq(user.user_id))
        .into_tuple::<Uuid>()
        .all(&state.orm)
        .await?;
    Ok(ids)
}

/// Account details prefilled from the company profile. Buyers may edit every
/// field before submitting.
pub async fn prefill_account_details(
    state: &AppState,
    user: &AuthUser,
    company_id: Uuid,
) -> AppResult<ApiResponse<AccountDetails>> {
    ensure_member(state, user, company_id).await?;
    let company = Companies::find_by_id(company_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(ApiResponse::success(
        "Account details",
        account_details_from_company(company),
        Some(Meta::empty()),
    ))
}

fn account_details_from_company(company: CompanyModel) -> AccountDetails {
    AccountDetails {
        contact_name: company.contact_name.unwrap_or_default(),
        email: company.email.unwrap_or_default(),
        phone: company.phone,
        company_name: company.name,
        tax_id: company.tax_id,
        billing_address: BillingAddress {
            line1: company.address_line1.unwrap_or_default(),
            line2: company.address_line2,
            city: company.city.unwrap_or_default(),
            region: company.region,
            postal_code: company.postal_code.unwrap_or_default(),
            country: company.country.unwrap_or_default(),
        },
    }
}
