use chrono::{Duration, Utc};
use event_commerce_api::domain::{
    Cart, CartItem, CountPolicy, Ledger, LedgerError, OrderStatus, ProductType,
};
use uuid::Uuid;

fn line(resource_id: Uuid, sub: Option<Uuid>, resource_type: ProductType) -> CartItem {
    CartItem {
        resource_id,
        resource_type,
        unit_price: 1_000,
        sub_selection_id: sub,
        name: "Line".into(),
        image: None,
    }
}

#[test]
fn unlimited_resources_are_always_available() {
    let ticket = Uuid::new_v4();
    let mut ledger = Ledger::new();
    ledger.track(ticket, None, 10_000);

    let availability = ledger.check_availability(ticket, None, 1_000_000).unwrap();

    assert!(availability.ok);
    assert_eq!(availability.remaining, None);
}

#[test]
fn remaining_is_allotment_minus_commitments() {
    let sponsor = Uuid::new_v4();
    let mut ledger = Ledger::new();
    ledger.track(sponsor, Some(3), 2);

    assert_eq!(ledger.remaining(sponsor).unwrap(), Some(1));
    assert!(ledger.check_availability(sponsor, None, 1).unwrap().ok);
    assert!(!ledger.check_availability(sponsor, None, 2).unwrap().ok);
}

#[test]
fn sub_selection_draws_on_its_own_row() {
    let booth = Uuid::new_v4();
    let slot = Uuid::new_v4();
    let mut ledger = Ledger::new();
    ledger.track(booth, None, 0);
    ledger.track(slot, Some(1), 0);

    ledger.commit(booth, Some(slot), 1).unwrap();

    assert_eq!(ledger.remaining(slot).unwrap(), Some(0));
    assert_eq!(
        ledger.commit(booth, Some(slot), 1),
        Err(LedgerError::Insufficient {
            inventory_id: slot,
            requested: 1,
            remaining: 0,
        })
    );
}

#[test]
fn unknown_resources_are_errors() {
    let ledger = Ledger::new();
    let missing = Uuid::new_v4();

    assert_eq!(
        ledger.check_availability(missing, None, 1),
        Err(LedgerError::UnknownResource(missing))
    );
}

#[test]
fn reserve_cart_is_all_or_nothing() {
    let ticket = Uuid::new_v4();
    let gold = Uuid::new_v4();
    let mut ledger = Ledger::new();
    ledger.track(ticket, Some(100), 0);
    ledger.track(gold, Some(1), 1);
    let before = ledger.clone();

    let mut cart = Cart::new(Uuid::new_v4());
    cart.add(line(ticket, None, ProductType::Ticket), 2);
    cart.add(line(gold, None, ProductType::Sponsor), 1);

    let failures = ledger.reserve_cart(&cart).unwrap_err();

    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].resource_id, gold);
    assert_eq!(failures[0].remaining, Some(0));
    assert_eq!(ledger, before);
}

#[test]
fn reserve_cart_commits_every_line() {
    let hotel = Uuid::new_v4();
    let room = Uuid::new_v4();
    let ticket = Uuid::new_v4();
    let mut ledger = Ledger::new();
    ledger.track(room, Some(5), 1);
    ledger.track(ticket, None, 0);

    let mut cart = Cart::new(Uuid::new_v4());
    cart.add(line(hotel, Some(room), ProductType::Hotel), 4);
    cart.add(line(ticket, None, ProductType::Ticket), 3);

    ledger.reserve_cart(&cart).unwrap();

    assert_eq!(ledger.remaining(room).unwrap(), Some(0));
    assert_eq!(ledger.committed(ticket), Some(3));
}

#[test]
fn lines_sharing_a_row_are_checked_together() {
    let booth = Uuid::new_v4();
    let slot = Uuid::new_v4();
    let mut ledger = Ledger::new();
    ledger.track(slot, Some(2), 0);

    let mut cart = Cart::new(Uuid::new_v4());
    cart.add(line(booth, Some(slot), ProductType::Booth), 2);
    // Same inventory row reached without the parent: a different cart key.
    cart.add(line(slot, None, ProductType::Booth), 1);

    let failures = ledger.reserve_cart(&cart).unwrap_err();

    assert_eq!(failures.len(), 1);
    assert_eq!(ledger.committed(slot), Some(0));
}

#[test]
fn unknown_line_is_reported_as_failure() {
    let mut ledger = Ledger::new();
    let mut cart = Cart::new(Uuid::new_v4());
    let missing = Uuid::new_v4();
    cart.add(line(missing, None, ProductType::Ticket), 1);

    let failures = ledger.reserve_cart(&cart).unwrap_err();

    assert_eq!(failures[0].resource_id, missing);
    assert_eq!(failures[0].requested, 1);
}

#[test]
fn completed_orders_always_count() {
    let now = Utc::now();
    let policy = CountPolicy::default();

    assert!(policy.counts(OrderStatus::Completed, now - Duration::days(30), now));
    assert!(!policy.counts(OrderStatus::Failed, now, now));
    assert!(!policy.counts(OrderStatus::Refunded, now, now));
}

#[test]
fn pending_orders_hold_only_within_window() {
    let now = Utc::now();
    let policy = CountPolicy::with_pending_hold(Duration::minutes(15));

    assert!(policy.counts(OrderStatus::Pending, now - Duration::minutes(5), now));
    assert!(!policy.counts(OrderStatus::Pending, now - Duration::minutes(20), now));
}

#[test]
fn zero_hold_counts_completed_only() {
    let now = Utc::now();
    let policy = CountPolicy::with_pending_hold(Duration::zero());

    assert_eq!(policy, CountPolicy::completed_only());
    assert_eq!(policy.pending_cutoff(now), None);
    assert!(!policy.counts(OrderStatus::Pending, now, now));
}
