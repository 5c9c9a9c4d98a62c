use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::domain::{OfferScope, discount::CustomTargets};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateOfferRequest {
    pub event_id: Option<Uuid>,
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    pub code: Option<String>,
    #[validate(range(min = 1, max = 100, message = "percentage must be between 1 and 100"))]
    pub percentage: i32,
    pub scope: OfferScope,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub custom_targets: Option<CustomTargets>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateOfferRequest {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: Option<String>,
    pub code: Option<String>,
    #[validate(range(min = 1, max = 100, message = "percentage must be between 1 and 100"))]
    pub percentage: Option<i32>,
    pub scope: Option<OfferScope>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub is_active: Option<bool>,
    pub custom_targets: Option<CustomTargets>,
}
