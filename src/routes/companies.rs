use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    domain::checkout::AccountDetails,
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::company_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/{company_id}/account-details", get(account_details))
}

#[utoipa::path(
    get,
    path = "/api/companies/{company_id}/account-details",
    params(("company_id" = Uuid, Path, description = "Company ID")),
    responses(
        (status = 200, description = "Checkout account details prefilled from the company", body = ApiResponse<AccountDetails>),
        (status = 403, description = "Not a member of the company"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Companies"
)]
pub async fn account_details(
    State(state): State<AppState>,
    user: AuthUser,
    Path(company_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<AccountDetails>>> {
    let resp = company_service::prefill_account_details(&state, &user, company_id).await?;
    Ok(Json(resp))
}
