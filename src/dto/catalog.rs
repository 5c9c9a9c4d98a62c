use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{CatalogEntry, PromotionalOffer};

#[derive(Debug, Serialize, ToSchema)]
pub struct CatalogList {
    pub items: Vec<CatalogEntry>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OfferList {
    pub items: Vec<PromotionalOffer>,
}
