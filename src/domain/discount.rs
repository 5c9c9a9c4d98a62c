//! Coupon and promotional-offer resolution.
//!
//! `resolve` is pure: callers hand it the cart, the code the buyer typed (if
//! any), the coupons stored under that code, and the offers visible for the
//! event. It picks at most one discount and computes its amount.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use super::cart::{AmountOverflow, Cart, CartItem, sum_lines};
use super::types::{DiscountKind, OfferScope, ProductType};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DiscountError {
    #[error("coupon code {0} is not valid")]
    InvalidCoupon(String),

    #[error("{kind:?} discount value {value} is out of range")]
    OutOfRange { kind: DiscountKind, value: i64 },

    #[error(transparent)]
    Overflow(#[from] AmountOverflow),
}

/// Discount descriptor, decided once when the coupon is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "discount_type", content = "discount_value", rename_all = "snake_case")]
pub enum Discount {
    /// Amount in minor units.
    Fixed(i64),
    /// Whole percent in `1..=100`.
    Percentage(i32),
}

impl Discount {
    pub fn from_parts(kind: DiscountKind, value: i64) -> Result<Self, DiscountError> {
        match kind {
            DiscountKind::Fixed if value > 0 => Ok(Discount::Fixed(value)),
            DiscountKind::Percentage if (1..=100).contains(&value) => {
                Ok(Discount::Percentage(value as i32))
            }
            _ => Err(DiscountError::OutOfRange { kind, value }),
        }
    }

    pub fn kind(&self) -> DiscountKind {
        match self {
            Discount::Fixed(_) => DiscountKind::Fixed,
            Discount::Percentage(_) => DiscountKind::Percentage,
        }
    }

    pub fn value(&self) -> i64 {
        match *self {
            Discount::Fixed(amount) => amount,
            Discount::Percentage(pct) => i64::from(pct),
        }
    }

    /// Never exceeds `base`.
    pub fn amount_on(&self, base: i64) -> i64 {
        let base = base.max(0);
        match *self {
            Discount::Fixed(amount) => amount.clamp(0, base),
            Discount::Percentage(pct) => percent_of(base, pct),
        }
    }
}

/// `pct`% of `base`, rounded half up, clamped to `[0, base]`.
pub fn percent_of(base: i64, pct: i32) -> i64 {
    if base <= 0 || pct <= 0 {
        return 0;
    }
    let pct = i128::from(pct.min(100));
    let amount = (i128::from(base) * pct + 50) / 100;
    i64::try_from(amount).unwrap_or(base)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Coupon {
    pub code: String,
    pub discount: Discount,
    pub is_active: bool,
}

/// Explicit id sets for offers with `OfferScope::Custom`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CustomTargets {
    #[serde(default)]
    pub hotel_ids: Vec<Uuid>,
    #[serde(default)]
    pub ticket_ids: Vec<Uuid>,
    #[serde(default)]
    pub sponsor_ids: Vec<Uuid>,
    #[serde(default)]
    pub booth_ids: Vec<Uuid>,
}

impl CustomTargets {
    pub fn is_empty(&self) -> bool {
        self.hotel_ids.is_empty()
            && self.ticket_ids.is_empty()
            && self.sponsor_ids.is_empty()
            && self.booth_ids.is_empty()
    }

    fn contains(&self, item: &CartItem) -> bool {
        let ids = match item.resource_type {
            ProductType::Hotel => &self.hotel_ids,
            ProductType::Ticket => &self.ticket_ids,
            ProductType::Sponsor => &self.sponsor_ids,
            ProductType::Booth => &self.booth_ids,
        };
        // A room type or booth slot is covered by its owning hotel or booth.
        ids.contains(&item.resource_id)
            || item
                .sub_selection_id
                .is_some_and(|sub| ids.contains(&sub))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PromotionalOffer {
    pub id: Uuid,
    pub name: String,
    pub code: Option<String>,
    pub percentage: i32,
    pub scope: OfferScope,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub targets: CustomTargets,
}

/// Why an offer was left out. Never surfaced to buyers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ineligible {
    Inactive,
    OutsideWindow,
    InvalidPercentage,
    NoMatchingLines,
}

impl PromotionalOffer {
    pub fn eligibility(&self, now: DateTime<Utc>) -> Result<(), Ineligible> {
        if !self.is_active {
            return Err(Ineligible::Inactive);
        }
        if self.starts_at.is_some_and(|start| now < start)
            || self.ends_at.is_some_and(|end| now > end)
        {
            return Err(Ineligible::OutsideWindow);
        }
        if !(1..=100).contains(&self.percentage) {
            return Err(Ineligible::InvalidPercentage);
        }
        Ok(())
    }

    pub fn matches(&self, item: &CartItem) -> bool {
        match self.scope {
            OfferScope::All => true,
            OfferScope::Hotels => item.resource_type == ProductType::Hotel,
            OfferScope::Tickets => item.resource_type == ProductType::Ticket,
            OfferScope::Sponsors => item.resource_type == ProductType::Sponsor,
            OfferScope::Booths => item.resource_type == ProductType::Booth,
            OfferScope::Custom => self.targets.contains(item),
        }
    }

    /// Subtotal of the lines this offer covers.
    pub fn eligible_base(&self, cart: &Cart) -> Result<i64, AmountOverflow> {
        sum_lines(cart.lines().iter().filter(|line| self.matches(&line.item)))
    }

    pub fn discount_on(&self, cart: &Cart) -> Result<i64, AmountOverflow> {
        Ok(percent_of(self.eligible_base(cart)?, self.percentage))
    }

    fn has_code(&self, code: &str) -> bool {
        self.code
            .as_deref()
            .is_some_and(|own| own.to_lowercase() == code)
    }
}

/// What the buyer gets for a given cart.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiscountSource {
    None,
    Coupon {
        code: String,
        discount: Discount,
    },
    Offer {
        offer_id: Uuid,
        name: String,
        percentage: i32,
        scope: OfferScope,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Resolution {
    pub subtotal: i64,
    pub discount_amount: i64,
    pub total: i64,
    pub applied: DiscountSource,
}

impl Resolution {
    fn new(subtotal: i64, discount_amount: i64, applied: DiscountSource) -> Self {
        let discount_amount = discount_amount.clamp(0, subtotal.max(0));
        Self {
            subtotal,
            discount_amount,
            total: subtotal - discount_amount,
            applied,
        }
    }

    pub fn none(subtotal: i64) -> Self {
        Self::new(subtotal, 0, DiscountSource::None)
    }
}

/// Pick the single discount for `cart`.
///
/// A matching active coupon always wins and short-circuits offer evaluation.
/// A code that matches no coupon may still unlock offers carrying that code;
/// if it unlocks nothing the result is `InvalidCoupon`. Among eligible offers
/// the largest amount wins, then the larger percentage, then the lower id.
pub fn resolve(
    cart: &Cart,
    code: Option<&str>,
    coupons: &[Coupon],
    offers: &[PromotionalOffer],
    now: DateTime<Utc>,
) -> Result<Resolution, DiscountError> {
    let subtotal = cart.total()?;
    let typed = code.map(str::trim).filter(|c| !c.is_empty());
    let code = typed.map(str::to_lowercase);

    if let Some(code) = code.as_deref() {
        if let Some(coupon) = coupons
            .iter()
            .find(|c| c.is_active && c.code.to_lowercase() == code)
        {
            let amount = coupon.discount.amount_on(subtotal);
            return Ok(Resolution::new(
                subtotal,
                amount,
                DiscountSource::Coupon {
                    code: coupon.code.clone(),
                    discount: coupon.discount,
                },
            ));
        }
    }

    let mut unlocked_by_code = false;
    let mut best: Option<(&PromotionalOffer, i64)> = None;
    for offer in offers {
        match (&offer.code, code.as_deref()) {
            (None, _) => {}
            (Some(_), Some(code)) if offer.has_code(code) => {}
            _ => continue,
        }
        if let Err(reason) = offer.eligibility(now) {
            tracing::debug!(offer_id = %offer.id, ?reason, "offer excluded");
            continue;
        }
        let amount = offer.discount_on(cart)?;
        if amount <= 0 {
            tracing::debug!(
                offer_id = %offer.id,
                reason = ?Ineligible::NoMatchingLines,
                "offer excluded"
            );
            continue;
        }
        if offer.code.is_some() {
            unlocked_by_code = true;
        }
        let better = match best {
            None => true,
            Some((current, current_amount)) => amount
                .cmp(&current_amount)
                .then(offer.percentage.cmp(&current.percentage))
                .then(current.id.cmp(&offer.id))
                .is_gt(),
        };
        if better {
            best = Some((offer, amount));
        }
    }

    if let Some(typed) = typed {
        if !unlocked_by_code {
            return Err(DiscountError::InvalidCoupon(typed.to_string()));
        }
    }

    Ok(match best {
        Some((offer, amount)) => Resolution::new(
            subtotal,
            amount,
            DiscountSource::Offer {
                offer_id: offer.id,
                name: offer.name.clone(),
                percentage: offer.percentage,
                scope: offer.scope,
            },
        ),
        None => Resolution::none(subtotal),
    })
}
