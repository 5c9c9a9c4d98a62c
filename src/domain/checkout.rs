//! Checkout session state machine.
//!
//! `CartReview -> AccountDetails -> PaymentSelection -> Submitted -> {Completed | Failed}`
//!
//! The session only enforces ordering and input validity. Availability and
//! persistence happen in `services::checkout_service`, which drives the
//! session to `Completed` or `Failed` once the transaction settles.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::cart::Cart;
use super::discount::{DiscountError, Resolution};
use super::inventory::LineFailure;
use super::types::PaymentMethod;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CheckoutError {
    #[error("Cart is empty")]
    EmptyCart,

    #[error("Coupon {0} is not valid")]
    InvalidCoupon(String),

    #[error("Insufficient inventory")]
    InsufficientInventory(Vec<LineFailure>),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Cannot {action} while checkout is at {step:?}")]
    OutOfOrder {
        step: CheckoutStep,
        action: &'static str,
    },
}

impl From<DiscountError> for CheckoutError {
    fn from(err: DiscountError) -> Self {
        match err {
            DiscountError::InvalidCoupon(code) => CheckoutError::InvalidCoupon(code),
            err @ (DiscountError::OutOfRange { .. } | DiscountError::Overflow(_)) => {
                CheckoutError::Validation(err.to_string())
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStep {
    CartReview,
    AccountDetails,
    PaymentSelection,
    Submitted,
    Completed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct BillingAddress {
    #[validate(length(min = 1, message = "address line is required"))]
    pub line1: String,
    #[serde(default)]
    pub line2: Option<String>,
    #[validate(length(min = 1, message = "city is required"))]
    pub city: String,
    #[serde(default)]
    pub region: Option<String>,
    #[validate(length(min = 1, message = "postal code is required"))]
    pub postal_code: String,
    #[validate(length(equal = 2, message = "country must be an ISO 3166 alpha-2 code"))]
    pub country: String,
}

/// Buyer contact and billing fields, snapshotted onto the order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct AccountDetails {
    #[validate(length(min = 1, message = "contact name is required"))]
    pub contact_name: String,
    #[validate(email(message = "email is invalid"))]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[validate(length(min = 1, message = "company name is required"))]
    pub company_name: String,
    #[serde(default)]
    pub tax_id: Option<String>,
    #[validate(nested)]
    pub billing_address: BillingAddress,
}

/// Everything the orchestrator needs to persist an order.
#[derive(Debug, Clone)]
pub struct CheckoutSubmission {
    pub cart: Cart,
    pub coupon_code: Option<String>,
    /// Pricing shown at review time; persistence reprices from the catalog.
    pub preview: Resolution,
    pub account: AccountDetails,
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Clone)]
pub struct CheckoutSession {
    cart: Cart,
    step: CheckoutStep,
    coupon_code: Option<String>,
    resolution: Option<Resolution>,
    account: Option<AccountDetails>,
    payment_method: Option<PaymentMethod>,
    order_id: Option<Uuid>,
    failure: Option<String>,
}

impl CheckoutSession {
    pub fn new(cart: Cart) -> Self {
        Self {
            cart,
            step: CheckoutStep::CartReview,
            coupon_code: None,
            resolution: None,
            account: None,
            payment_method: None,
            order_id: None,
            failure: None,
        }
    }

    pub fn step(&self) -> CheckoutStep {
        self.step
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn resolution(&self) -> Option<&Resolution> {
        self.resolution.as_ref()
    }

    pub fn order_id(&self) -> Option<Uuid> {
        self.order_id
    }

    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    fn expect_step(&self, expected: CheckoutStep, action: &'static str) -> Result<(), CheckoutError> {
        if self.step != expected {
            return Err(CheckoutError::OutOfOrder {
                step: self.step,
                action,
            });
        }
        Ok(())
    }

    /// Accept the cart with its resolved discount and move on to account details.
    pub fn review(
        &mut self,
        coupon_code: Option<String>,
        resolution: Resolution,
    ) -> Result<(), CheckoutError> {
        self.expect_step(CheckoutStep::CartReview, "review the cart")?;
        if self.cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        self.coupon_code = coupon_code;
        self.resolution = Some(resolution);
        self.step = CheckoutStep::AccountDetails;
        Ok(())
    }

    pub fn enter_account_details(&mut self, details: AccountDetails) -> Result<(), CheckoutError> {
        self.expect_step(CheckoutStep::AccountDetails, "enter account details")?;
        details
            .validate()
            .map_err(|err| CheckoutError::Validation(err.to_string()))?;
        self.account = Some(details);
        self.step = CheckoutStep::PaymentSelection;
        Ok(())
    }

    pub fn select_payment(
        &mut self,
        method: Option<PaymentMethod>,
        accepted_terms: bool,
        accepted_policies: bool,
    ) -> Result<(), CheckoutError> {
        self.expect_step(CheckoutStep::PaymentSelection, "select payment")?;
        let method = method
            .ok_or_else(|| CheckoutError::Validation("payment method is required".into()))?;
        if !accepted_terms {
            return Err(CheckoutError::Validation("terms must be accepted".into()));
        }
        if !accepted_policies {
            return Err(CheckoutError::Validation("policies must be accepted".into()));
        }
        self.payment_method = Some(method);
        Ok(())
    }

    pub fn submit(&mut self) -> Result<CheckoutSubmission, CheckoutError> {
        self.expect_step(CheckoutStep::PaymentSelection, "submit")?;
        let (Some(payment_method), Some(account), Some(preview)) = (
            self.payment_method,
            self.account.clone(),
            self.resolution.clone(),
        ) else {
            return Err(CheckoutError::Validation(
                "payment method must be selected before submitting".into(),
            ));
        };
        self.step = CheckoutStep::Submitted;
        Ok(CheckoutSubmission {
            cart: self.cart.clone(),
            coupon_code: self.coupon_code.clone(),
            preview,
            account,
            payment_method,
        })
    }

    pub fn complete(&mut self, order_id: Uuid) -> Result<(), CheckoutError> {
        self.expect_step(CheckoutStep::Submitted, "complete")?;
        self.order_id = Some(order_id);
        self.step = CheckoutStep::Completed;
        Ok(())
    }

    pub fn fail(&mut self, reason: impl Into<String>) -> Result<(), CheckoutError> {
        self.expect_step(CheckoutStep::Submitted, "fail")?;
        self.failure = Some(reason.into());
        self.step = CheckoutStep::Failed;
        Ok(())
    }
}
