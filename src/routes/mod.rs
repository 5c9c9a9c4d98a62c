use axum::Router;

use crate::state::AppState;

pub mod admin;
pub mod checkout;
pub mod companies;
pub mod coupons;
pub mod doc;
pub mod events;
pub mod health;
pub mod orders;
pub mod params;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/events", events::router())
        .nest("/coupons", coupons::router())
        .nest("/checkout", checkout::router())
        .nest("/orders", orders::router())
        .nest("/companies", companies::router())
        .nest("/admin", admin::router())
}
