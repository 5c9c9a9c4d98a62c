//! Event-scoped cart store.
//!
//! The cart is an optimistic, client-held selection: nothing here consults
//! inventory. Lines are keyed by `(resource_id, sub_selection_id)`.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::types::ProductType;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("cart amount exceeds the supported range")]
pub struct AmountOverflow;

/// A purchasable selection, without a quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct CartItem {
    pub resource_id: Uuid,
    pub resource_type: ProductType,
    /// Price in minor units, snapshotted when the item was added.
    #[validate(range(min = 0, message = "unit price cannot be negative"))]
    pub unit_price: i64,
    /// Room type of a hotel or sub-slot of a booth.
    #[serde(default)]
    pub sub_selection_id: Option<Uuid>,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
}

impl CartItem {
    /// Row in the catalog whose allotment this item draws from.
    pub fn inventory_id(&self) -> Uuid {
        self.sub_selection_id.unwrap_or(self.resource_id)
    }

    fn same_key(&self, resource_id: Uuid, sub_selection_id: Option<Uuid>) -> bool {
        self.resource_id == resource_id && self.sub_selection_id == sub_selection_id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct CartLine {
    #[serde(flatten)]
    #[validate(nested)]
    pub item: CartItem,
    pub quantity: u32,
}

impl CartLine {
    pub fn line_total(&self) -> Result<i64, AmountOverflow> {
        self.item
            .unit_price
            .checked_mul(i64::from(self.quantity))
            .ok_or(AmountOverflow)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cart {
    event_id: Uuid,
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new(event_id: Uuid) -> Self {
        Self {
            event_id,
            lines: Vec::new(),
        }
    }

    /// Build a cart by replaying `add` for every line, merging duplicate keys.
    pub fn from_lines(event_id: Uuid, lines: impl IntoIterator<Item = CartLine>) -> Self {
        let mut cart = Self::new(event_id);
        for line in lines {
            cart.add(line.item, line.quantity);
        }
        cart
    }

    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Distinct inventory rows the cart draws from, ascending.
    pub fn inventory_ids(&self) -> Vec<Uuid> {
        let mut ids: Vec<Uuid> = self
            .lines
            .iter()
            .map(|line| line.item.inventory_id())
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }

    /// Merge into the line with the same key, or append. A zero quantity is ignored.
    pub fn add(&mut self, item: CartItem, quantity: u32) {
        if quantity == 0 {
            return;
        }
        match self
            .lines
            .iter_mut()
            .find(|line| line.item.same_key(item.resource_id, item.sub_selection_id))
        {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(quantity),
            None => self.lines.push(CartLine { item, quantity }),
        }
    }

    pub fn remove(&mut self, resource_id: Uuid, sub_selection_id: Option<Uuid>) {
        self.lines
            .retain(|line| !line.item.same_key(resource_id, sub_selection_id));
    }

    /// Negative quantities clamp to zero; zero removes the line.
    pub fn set_quantity(&mut self, resource_id: Uuid, quantity: i64, sub_selection_id: Option<Uuid>) {
        let quantity = u32::try_from(quantity.max(0)).unwrap_or(u32::MAX);
        if quantity == 0 {
            self.remove(resource_id, sub_selection_id);
            return;
        }
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.item.same_key(resource_id, sub_selection_id))
        {
            line.quantity = quantity;
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn total(&self) -> Result<i64, AmountOverflow> {
        sum_lines(self.lines.iter())
    }

    /// Replace snapshotted prices and names with the catalog's current values.
    /// Lines for which `lookup` returns `None` are left untouched.
    pub fn reprice<F>(&mut self, mut lookup: F)
    where
        F: FnMut(&CartItem) -> Option<(i64, String)>,
    {
        for line in &mut self.lines {
            if let Some((price, name)) = lookup(&line.item) {
                line.item.unit_price = price;
                line.item.name = name;
            }
        }
    }
}

/// Checked sum of line totals.
pub(crate) fn sum_lines<'a>(
    mut lines: impl Iterator<Item = &'a CartLine>,
) -> Result<i64, AmountOverflow> {
    lines.try_fold(0i64, |acc, line| {
        acc.checked_add(line.line_total()?).ok_or(AmountOverflow)
    })
}
