use chrono::{Duration, Utc};
use event_commerce_api::domain::{
    Cart, CartItem, Discount, DiscountError, DiscountKind, DiscountSource, OfferScope, ProductType,
    discount::{Coupon, CustomTargets, PromotionalOffer, percent_of, resolve},
};
use uuid::Uuid;

fn item(resource_type: ProductType, price: i64) -> CartItem {
    CartItem {
        resource_id: Uuid::new_v4(),
        resource_type,
        unit_price: price,
        sub_selection_id: None,
        name: format!("{resource_type:?}"),
        image: None,
    }
}

fn cart_of(items: Vec<(CartItem, u32)>) -> Cart {
    let mut cart = Cart::new(Uuid::new_v4());
    for (item, quantity) in items {
        cart.add(item, quantity);
    }
    cart
}

fn offer(scope: OfferScope, percentage: i32) -> PromotionalOffer {
    PromotionalOffer {
        id: Uuid::new_v4(),
        name: format!("{scope:?} {percentage}%"),
        code: None,
        percentage,
        scope,
        starts_at: None,
        ends_at: None,
        is_active: true,
        targets: CustomTargets::default(),
    }
}

fn summer25() -> Coupon {
    Coupon {
        code: "SUMMER25".into(),
        discount: Discount::Percentage(25),
        is_active: true,
    }
}

#[test]
fn percentage_coupon_discounts_whole_subtotal() {
    let cart = cart_of(vec![(item(ProductType::Ticket, 20_000), 1)]);

    let resolution = resolve(&cart, Some("SUMMER25"), &[summer25()], &[], Utc::now()).unwrap();

    assert_eq!(resolution.subtotal, 20_000);
    assert_eq!(resolution.discount_amount, 5_000);
    assert_eq!(resolution.total, 15_000);
    assert!(matches!(resolution.applied, DiscountSource::Coupon { ref code, .. } if code == "SUMMER25"));
}

#[test]
fn coupon_codes_match_case_insensitively() {
    let cart = cart_of(vec![(item(ProductType::Ticket, 20_000), 1)]);

    let resolution = resolve(&cart, Some("  summer25 "), &[summer25()], &[], Utc::now()).unwrap();

    assert_eq!(resolution.discount_amount, 5_000);
}

#[test]
fn hotel_offer_only_discounts_hotel_lines() {
    let cart = cart_of(vec![
        (item(ProductType::Hotel, 10_000), 1),
        (item(ProductType::Ticket, 5_000), 1),
    ]);
    let hotels = offer(OfferScope::Hotels, 10);

    let resolution = resolve(&cart, None, &[], &[hotels.clone()], Utc::now()).unwrap();

    assert_eq!(resolution.discount_amount, 1_000);
    assert_eq!(resolution.total, 14_000);
    assert!(matches!(resolution.applied, DiscountSource::Offer { offer_id, .. } if offer_id == hotels.id));
}

#[test]
fn custom_offer_matches_listed_ids_and_owning_hotel() {
    let hotel_id = Uuid::new_v4();
    let mut room = item(ProductType::Hotel, 10_000);
    room.resource_id = hotel_id;
    room.sub_selection_id = Some(Uuid::new_v4());
    let ticket = item(ProductType::Ticket, 5_000);
    let other_ticket = item(ProductType::Ticket, 8_000);

    let mut custom = offer(OfferScope::Custom, 50);
    custom.targets = CustomTargets {
        hotel_ids: vec![hotel_id],
        ticket_ids: vec![ticket.resource_id],
        ..CustomTargets::default()
    };
    let cart = cart_of(vec![(room, 1), (ticket, 2), (other_ticket, 1)]);

    let resolution = resolve(&cart, None, &[], &[custom], Utc::now()).unwrap();

    assert_eq!(resolution.subtotal, 28_000);
    assert_eq!(resolution.discount_amount, 10_000);
}

#[test]
fn coupon_takes_precedence_over_larger_offer() {
    let cart = cart_of(vec![(item(ProductType::Ticket, 20_000), 1)]);
    let all_half = offer(OfferScope::All, 50);

    let resolution = resolve(&cart, Some("SUMMER25"), &[summer25()], &[all_half], Utc::now()).unwrap();

    assert_eq!(resolution.discount_amount, 5_000);
    assert!(matches!(resolution.applied, DiscountSource::Coupon { .. }));
}

#[test]
fn unknown_code_is_invalid_coupon() {
    let cart = cart_of(vec![(item(ProductType::Ticket, 20_000), 1)]);

    let err = resolve(&cart, Some("NOPE"), &[summer25()], &[], Utc::now()).unwrap_err();

    assert_eq!(err, DiscountError::InvalidCoupon("NOPE".into()));
}

#[test]
fn inactive_coupon_is_invalid() {
    let cart = cart_of(vec![(item(ProductType::Ticket, 20_000), 1)]);
    let mut coupon = summer25();
    coupon.is_active = false;

    let err = resolve(&cart, Some("SUMMER25"), &[coupon], &[], Utc::now()).unwrap_err();

    assert!(matches!(err, DiscountError::InvalidCoupon(_)));
}

#[test]
fn code_can_unlock_gated_offer() {
    let cart = cart_of(vec![(item(ProductType::Sponsor, 100_000), 1)]);
    let mut gated = offer(OfferScope::Sponsors, 20);
    gated.code = Some("Partner".into());

    let locked = resolve(&cart, None, &[], &[gated.clone()], Utc::now()).unwrap();
    assert_eq!(locked.discount_amount, 0);
    assert_eq!(locked.applied, DiscountSource::None);

    let unlocked = resolve(&cart, Some("PARTNER"), &[], &[gated], Utc::now()).unwrap();
    assert_eq!(unlocked.discount_amount, 20_000);
}

#[test]
fn offers_outside_window_or_range_are_skipped() {
    let now = Utc::now();
    let cart = cart_of(vec![(item(ProductType::Ticket, 10_000), 1)]);

    let mut expired = offer(OfferScope::All, 30);
    expired.ends_at = Some(now - Duration::days(1));
    let mut upcoming = offer(OfferScope::All, 40);
    upcoming.starts_at = Some(now + Duration::days(1));
    let over = offer(OfferScope::All, 150);
    let mut inactive = offer(OfferScope::All, 60);
    inactive.is_active = false;
    let valid = offer(OfferScope::All, 10);

    let resolution = resolve(&cart, None, &[], &[expired, upcoming, over, inactive, valid.clone()], now).unwrap();

    assert_eq!(resolution.discount_amount, 1_000);
    assert!(matches!(resolution.applied, DiscountSource::Offer { offer_id, .. } if offer_id == valid.id));
}

#[test]
fn offer_without_matching_lines_applies_nothing() {
    let cart = cart_of(vec![(item(ProductType::Ticket, 10_000), 1)]);

    let resolution = resolve(&cart, None, &[], &[offer(OfferScope::Hotels, 50)], Utc::now()).unwrap();

    assert_eq!(resolution.applied, DiscountSource::None);
    assert_eq!(resolution.total, 10_000);
}

#[test]
fn largest_amount_wins_then_lower_id_on_ties() {
    let cart = cart_of(vec![
        (item(ProductType::Hotel, 10_000), 1),
        (item(ProductType::Ticket, 30_000), 1),
    ]);
    let hotels = offer(OfferScope::Hotels, 50);
    let tickets = offer(OfferScope::Tickets, 20);

    let resolution = resolve(&cart, None, &[], &[hotels, tickets.clone()], Utc::now()).unwrap();
    assert!(matches!(resolution.applied, DiscountSource::Offer { offer_id, .. } if offer_id == tickets.id));

    let mut first = offer(OfferScope::All, 10);
    let mut second = offer(OfferScope::All, 10);
    first.id = Uuid::from_u128(1);
    second.id = Uuid::from_u128(2);
    let resolution = resolve(&cart, None, &[], &[second, first], Utc::now()).unwrap();
    assert!(matches!(resolution.applied, DiscountSource::Offer { offer_id, .. } if offer_id == Uuid::from_u128(1)));
}

#[test]
fn fixed_coupon_is_capped_at_subtotal() {
    let cart = cart_of(vec![(item(ProductType::Ticket, 3_000), 1)]);
    let coupon = Coupon {
        code: "BIG".into(),
        discount: Discount::Fixed(10_000),
        is_active: true,
    };

    let resolution = resolve(&cart, Some("BIG"), &[coupon], &[], Utc::now()).unwrap();

    assert_eq!(resolution.discount_amount, 3_000);
    assert_eq!(resolution.total, 0);
}

#[test]
fn resolving_twice_gives_the_same_result() {
    let now = Utc::now();
    let cart = cart_of(vec![
        (item(ProductType::Hotel, 10_000), 2),
        (item(ProductType::Booth, 150_000), 1),
    ]);
    let offers = vec![offer(OfferScope::Hotels, 15), offer(OfferScope::Booths, 5)];

    let first = resolve(&cart, None, &[], &offers, now).unwrap();
    let second = resolve(&cart, None, &[], &offers, now).unwrap();

    assert_eq!(first, second);
}

#[test]
fn empty_cart_resolves_to_zero() {
    let cart = Cart::new(Uuid::new_v4());

    let resolution = resolve(&cart, None, &[], &[offer(OfferScope::All, 10)], Utc::now()).unwrap();

    assert_eq!(resolution.subtotal, 0);
    assert_eq!(resolution.total, 0);
    assert_eq!(resolution.applied, DiscountSource::None);
}

#[test]
fn percentages_round_half_up() {
    assert_eq!(percent_of(1_005, 10), 101);
    assert_eq!(percent_of(1_004, 10), 100);
    assert_eq!(percent_of(999, 100), 999);
    assert_eq!(percent_of(0, 50), 0);
    assert_eq!(percent_of(i64::MAX, 100), i64::MAX);
    assert_eq!(percent_of(i64::MAX, 50), i64::MAX / 2 + 1);
}

#[test]
fn overflowing_cart_is_rejected() {
    let cart = cart_of(vec![(item(ProductType::Sponsor, i64::MAX / 2 + 1), 2)]);

    let result = resolve(&cart, None, &[], &[offer(OfferScope::All, 10)], Utc::now());

    assert!(matches!(result, Err(DiscountError::Overflow(_))));
}

#[test]
fn discount_descriptors_reject_out_of_range_values() {
    assert_eq!(Discount::from_parts(DiscountKind::Percentage, 25), Ok(Discount::Percentage(25)));
    assert!(Discount::from_parts(DiscountKind::Percentage, 0).is_err());
    assert!(Discount::from_parts(DiscountKind::Percentage, 101).is_err());
    assert!(Discount::from_parts(DiscountKind::Fixed, -5).is_err());
    assert_eq!(Discount::from_parts(DiscountKind::Fixed, 500), Ok(Discount::Fixed(500)));
}

#[test]
fn discount_serializes_as_type_and_value() {
    let json = serde_json::to_value(Discount::Percentage(25)).unwrap();
    assert_eq!(json, serde_json::json!({ "discount_type": "percentage", "discount_value": 25 }));
}
