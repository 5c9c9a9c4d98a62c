//! Checkout and discount-resolution core.
//!
//! Everything under this module is free of I/O: the services layer loads
//! catalog rows, coupons, offers and committed quantities, then hands them to
//! these types to decide what a cart costs and whether it can be sold.

pub mod cart;
pub mod checkout;
pub mod discount;
pub mod inventory;
pub mod types;

pub use cart::{AmountOverflow, Cart, CartItem, CartLine};
pub use checkout::{CheckoutError, CheckoutSession, CheckoutStep, CheckoutSubmission};
pub use discount::{Discount, DiscountError, DiscountSource, Resolution};
pub use inventory::{Availability, CountPolicy, Ledger, LedgerError, LineFailure};
pub use types::{DiscountKind, OfferScope, OrderStatus, PaymentMethod, ProductType, ResourceKind};
