use event_commerce_api::domain::{
    Cart, CartItem, CheckoutError, CheckoutSession, CheckoutStep, PaymentMethod, ProductType,
    Resolution,
    checkout::{AccountDetails, BillingAddress},
};
use uuid::Uuid;

fn cart() -> Cart {
    let mut cart = Cart::new(Uuid::new_v4());
    cart.add(
        CartItem {
            resource_id: Uuid::new_v4(),
            resource_type: ProductType::Ticket,
            unit_price: 5_000,
            sub_selection_id: None,
            name: "General Admission".into(),
            image: None,
        },
        2,
    );
    cart
}

fn account() -> AccountDetails {
    AccountDetails {
        contact_name: "Ada Ferris".into(),
        email: "ada@ferris.example".into(),
        phone: None,
        company_name: "Ferris Exhibits Ltd".into(),
        tax_id: None,
        billing_address: BillingAddress {
            line1: "1 Harbour Street".into(),
            line2: None,
            city: "London".into(),
            region: None,
            postal_code: "E1 6AN".into(),
            country: "GB".into(),
        },
    }
}

fn reviewed() -> CheckoutSession {
    let cart = cart();
    let total = cart.total().unwrap();
    let mut session = CheckoutSession::new(cart);
    session.review(None, Resolution::none(total)).unwrap();
    session
}

#[test]
fn happy_path_walks_every_step() {
    let mut session = reviewed();
    assert_eq!(session.step(), CheckoutStep::AccountDetails);

    session.enter_account_details(account()).unwrap();
    assert_eq!(session.step(), CheckoutStep::PaymentSelection);

    session.select_payment(Some(PaymentMethod::Card), true, true).unwrap();
    let submission = session.submit().unwrap();
    assert_eq!(session.step(), CheckoutStep::Submitted);
    assert_eq!(submission.payment_method, PaymentMethod::Card);
    assert_eq!(submission.preview.total, 10_000);

    let order_id = Uuid::new_v4();
    session.complete(order_id).unwrap();
    assert_eq!(session.step(), CheckoutStep::Completed);
    assert_eq!(session.order_id(), Some(order_id));
}

#[test]
fn empty_cart_cannot_be_reviewed() {
    let mut session = CheckoutSession::new(Cart::new(Uuid::new_v4()));

    let err = session.review(None, Resolution::none(0)).unwrap_err();

    assert_eq!(err, CheckoutError::EmptyCart);
    assert_eq!(session.step(), CheckoutStep::CartReview);
}

#[test]
fn steps_cannot_be_skipped() {
    let mut session = CheckoutSession::new(cart());

    let err = session.enter_account_details(account()).unwrap_err();
    assert!(matches!(err, CheckoutError::OutOfOrder { step: CheckoutStep::CartReview, .. }));

    let err = session.submit().unwrap_err();
    assert!(matches!(err, CheckoutError::OutOfOrder { .. }));
}

#[test]
fn invalid_account_details_are_rejected() {
    let mut session = reviewed();
    let mut details = account();
    details.email = "not-an-email".into();
    details.billing_address.country = "GBR".into();

    let err = session.enter_account_details(details).unwrap_err();

    assert!(matches!(err, CheckoutError::Validation(_)));
    assert_eq!(session.step(), CheckoutStep::AccountDetails);
}

#[test]
fn payment_requires_method_and_both_acceptances() {
    let mut session = reviewed();
    session.enter_account_details(account()).unwrap();

    assert!(matches!(
        session.select_payment(None, true, true),
        Err(CheckoutError::Validation(_))
    ));
    assert!(matches!(
        session.select_payment(Some(PaymentMethod::Invoice), false, true),
        Err(CheckoutError::Validation(_))
    ));
    assert!(matches!(
        session.select_payment(Some(PaymentMethod::Invoice), true, false),
        Err(CheckoutError::Validation(_))
    ));
    assert!(session.submit().is_err());

    session.select_payment(Some(PaymentMethod::Invoice), true, true).unwrap();
    assert!(session.submit().unwrap().payment_method.is_offline());
}

#[test]
fn failure_is_recorded_only_after_submit() {
    let mut session = reviewed();
    session.enter_account_details(account()).unwrap();
    session.select_payment(Some(PaymentMethod::BankTransfer), true, true).unwrap();

    assert!(matches!(session.fail("too early"), Err(CheckoutError::OutOfOrder { .. })));

    session.submit().unwrap();
    session.fail("Insufficient inventory").unwrap();

    assert_eq!(session.step(), CheckoutStep::Failed);
    assert_eq!(session.failure(), Some("Insufficient inventory"));
    assert!(session.complete(Uuid::new_v4()).is_err());
}
