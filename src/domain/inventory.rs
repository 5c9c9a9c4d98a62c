//! Inventory ledger.
//!
//! Commitments are not stored separately: they are the order items of orders
//! whose status the [`CountPolicy`] counts. The services layer sums those
//! under row locks and loads the result into a [`Ledger`], which then decides
//! availability for every cart line of a checkout.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use super::cart::Cart;
use super::types::OrderStatus;

/// Which orders hold inventory.
///
/// Completed orders always count. Pending orders count as holds only while
/// younger than `pending_hold`; without a hold window they never count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountPolicy {
    pending_hold: Option<Duration>,
}

impl CountPolicy {
    pub fn completed_only() -> Self {
        Self { pending_hold: None }
    }

    pub fn with_pending_hold(hold: Duration) -> Self {
        if hold <= Duration::zero() {
            return Self::completed_only();
        }
        Self {
            pending_hold: Some(hold),
        }
    }

    pub fn pending_hold(&self) -> Option<Duration> {
        self.pending_hold
    }

    /// Pending orders created after this instant still hold inventory.
    pub fn pending_cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.pending_hold.map(|hold| now - hold)
    }

    pub fn counts(&self, status: OrderStatus, created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match status {
            OrderStatus::Completed => true,
            OrderStatus::Pending => self
                .pending_cutoff(now)
                .is_some_and(|cutoff| created_at > cutoff),
            OrderStatus::Failed | OrderStatus::Refunded => false,
        }
    }
}

impl Default for CountPolicy {
    fn default() -> Self {
        Self::with_pending_hold(Duration::minutes(15))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct Availability {
    pub ok: bool,
    /// `None` when the resource is unlimited.
    pub remaining: Option<i64>,
}

/// A cart line that could not be sold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct LineFailure {
    pub resource_id: Uuid,
    pub sub_selection_id: Option<Uuid>,
    pub requested: u32,
    pub remaining: Option<i64>,
    pub reason: String,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("resource {0} is not in the catalog")]
    UnknownResource(Uuid),

    #[error("only {remaining} of resource {inventory_id} left, {requested} requested")]
    Insufficient {
        inventory_id: Uuid,
        requested: i64,
        remaining: i64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Entry {
    allotted: Option<i64>,
    committed: i64,
}

impl Entry {
    fn remaining(&self) -> Option<i64> {
        self.allotted
            .map(|allotted| (allotted - self.committed).max(0))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    entries: HashMap<Uuid, Entry>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an inventory row. `allotted = None` means unlimited.
    pub fn track(&mut self, inventory_id: Uuid, allotted: Option<i64>, committed: i64) {
        self.entries.insert(
            inventory_id,
            Entry {
                allotted,
                committed: committed.max(0),
            },
        );
    }

    pub fn committed(&self, inventory_id: Uuid) -> Option<i64> {
        self.entries.get(&inventory_id).map(|entry| entry.committed)
    }

    pub fn remaining(&self, inventory_id: Uuid) -> Result<Option<i64>, LedgerError> {
        self.entries
            .get(&inventory_id)
            .map(Entry::remaining)
            .ok_or(LedgerError::UnknownResource(inventory_id))
    }

    pub fn check_availability(
        &self,
        resource_id: Uuid,
        sub_selection_id: Option<Uuid>,
        requested: i64,
    ) -> Result<Availability, LedgerError> {
        let remaining = self.remaining(sub_selection_id.unwrap_or(resource_id))?;
        Ok(Availability {
            ok: remaining.is_none_or(|left| requested <= left),
            remaining,
        })
    }

    pub fn commit(
        &mut self,
        resource_id: Uuid,
        sub_selection_id: Option<Uuid>,
        quantity: i64,
    ) -> Result<(), LedgerError> {
        let inventory_id = sub_selection_id.unwrap_or(resource_id);
        let entry = self
            .entries
            .get_mut(&inventory_id)
            .ok_or(LedgerError::UnknownResource(inventory_id))?;
        if let Some(remaining) = entry.remaining() {
            if quantity > remaining {
                return Err(LedgerError::Insufficient {
                    inventory_id,
                    requested: quantity,
                    remaining,
                });
            }
        }
        entry.committed += quantity;
        Ok(())
    }

    /// Commit every line of `cart` or none of them.
    ///
    /// Lines drawing on the same inventory row are checked cumulatively. On
    /// failure the ledger is unchanged and every failing line is reported.
    pub fn reserve_cart(&mut self, cart: &Cart) -> Result<(), Vec<LineFailure>> {
        let mut staged = self.clone();
        let mut failures = Vec::new();

        for line in cart.lines() {
            let item = &line.item;
            let requested = i64::from(line.quantity);
            if let Err(err) = staged.commit(item.resource_id, item.sub_selection_id, requested) {
                let remaining = match &err {
                    LedgerError::UnknownResource(_) => Some(0),
                    LedgerError::Insufficient { remaining, .. } => Some(*remaining),
                };
                failures.push(LineFailure {
                    resource_id: item.resource_id,
                    sub_selection_id: item.sub_selection_id,
                    requested: line.quantity,
                    remaining,
                    reason: err.to_string(),
                });
            }
        }

        if !failures.is_empty() {
            return Err(failures);
        }
        *self = staged;
        Ok(())
    }
}
