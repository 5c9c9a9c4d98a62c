use event_commerce_api::domain::{AmountOverflow, Cart, CartItem, CartLine, ProductType};
use uuid::Uuid;
use validator::Validate;

fn item(resource_id: Uuid, sub: Option<Uuid>, resource_type: ProductType, price: i64) -> CartItem {
    CartItem {
        resource_id,
        resource_type,
        unit_price: price,
        sub_selection_id: sub,
        name: "Item".into(),
        image: None,
    }
}

#[test]
fn adding_same_key_merges_quantities() {
    let ticket = Uuid::new_v4();
    let mut cart = Cart::new(Uuid::new_v4());

    cart.add(item(ticket, None, ProductType::Ticket, 5_000), 2);
    cart.add(item(ticket, None, ProductType::Ticket, 5_000), 3);

    assert_eq!(cart.lines().len(), 1);
    assert_eq!(cart.lines()[0].quantity, 5);
    assert_eq!(cart.total(), Ok(25_000));
}

#[test]
fn sub_selections_are_separate_lines() {
    let booth = Uuid::new_v4();
    let small = Uuid::new_v4();
    let large = Uuid::new_v4();
    let mut cart = Cart::new(Uuid::new_v4());

    cart.add(item(booth, Some(small), ProductType::Booth, 150_000), 1);
    cart.add(item(booth, Some(large), ProductType::Booth, 280_000), 1);
    cart.add(item(booth, Some(small), ProductType::Booth, 150_000), 1);

    assert_eq!(cart.lines().len(), 2);
    assert_eq!(cart.total(), Ok(580_000));
    assert_eq!(cart.lines()[0].item.inventory_id(), small);
}

#[test]
fn zero_quantity_add_is_ignored() {
    let mut cart = Cart::new(Uuid::new_v4());
    cart.add(item(Uuid::new_v4(), None, ProductType::Ticket, 5_000), 0);
    assert!(cart.is_empty());
}

#[test]
fn set_quantity_replaces_and_zero_or_negative_removes() {
    let ticket = Uuid::new_v4();
    let hotel = Uuid::new_v4();
    let room = Uuid::new_v4();
    let mut cart = Cart::new(Uuid::new_v4());
    cart.add(item(ticket, None, ProductType::Ticket, 5_000), 2);
    cart.add(item(hotel, Some(room), ProductType::Hotel, 10_000), 1);

    cart.set_quantity(ticket, 4, None);
    assert_eq!(cart.lines()[0].quantity, 4);

    cart.set_quantity(hotel, -3, Some(room));
    assert_eq!(cart.lines().len(), 1);

    cart.set_quantity(ticket, 0, None);
    assert!(cart.is_empty());
}

#[test]
fn set_quantity_for_missing_line_changes_nothing() {
    let mut cart = Cart::new(Uuid::new_v4());
    cart.add(item(Uuid::new_v4(), None, ProductType::Ticket, 5_000), 1);
    let before = cart.clone();

    cart.set_quantity(Uuid::new_v4(), 7, None);

    assert_eq!(cart, before);
}

#[test]
fn remove_then_re_add_restores_total() {
    let sponsor = Uuid::new_v4();
    let ticket = Uuid::new_v4();
    let mut cart = Cart::new(Uuid::new_v4());
    cart.add(item(ticket, None, ProductType::Ticket, 5_000), 2);
    cart.add(item(sponsor, None, ProductType::Sponsor, 1_000_000), 1);
    let total = cart.total();

    cart.remove(sponsor, None);
    assert_eq!(cart.total(), Ok(10_000));

    cart.add(item(sponsor, None, ProductType::Sponsor, 1_000_000), 1);
    assert_eq!(cart.total(), total);
}

#[test]
fn from_lines_merges_duplicates_and_drops_zero_quantities() {
    let ticket = Uuid::new_v4();
    let lines = vec![
        CartLine { item: item(ticket, None, ProductType::Ticket, 5_000), quantity: 1 },
        CartLine { item: item(Uuid::new_v4(), None, ProductType::Ticket, 7_000), quantity: 0 },
        CartLine { item: item(ticket, None, ProductType::Ticket, 5_000), quantity: 2 },
    ];

    let cart = Cart::from_lines(Uuid::new_v4(), lines);

    assert_eq!(cart.lines().len(), 1);
    assert_eq!(cart.lines()[0].quantity, 3);
}

#[test]
fn reprice_uses_catalog_values_and_keeps_unknown_lines() {
    let ticket = Uuid::new_v4();
    let unknown = Uuid::new_v4();
    let mut cart = Cart::new(Uuid::new_v4());
    cart.add(item(ticket, None, ProductType::Ticket, 1), 2);
    cart.add(item(unknown, None, ProductType::Ticket, 300), 1);

    cart.reprice(|line| (line.resource_id == ticket).then(|| (5_000, "General Admission".to_string())));

    assert_eq!(cart.lines()[0].item.unit_price, 5_000);
    assert_eq!(cart.lines()[0].item.name, "General Admission");
    assert_eq!(cart.lines()[1].item.unit_price, 300);
    assert_eq!(cart.total(), Ok(10_300));
}

#[test]
fn cart_line_deserializes_flat_json() {
    let resource_id = Uuid::new_v4();
    let json = serde_json::json!({
        "resource_id": resource_id,
        "resource_type": "ticket",
        "unit_price": 5000,
        "name": "General Admission",
        "quantity": 2
    });

    let line: CartLine = serde_json::from_value(json).expect("valid cart line");

    assert_eq!(line.item.resource_id, resource_id);
    assert_eq!(line.item.sub_selection_id, None);
    assert_eq!(line.line_total(), Ok(10_000));
}

#[test]
fn totals_report_overflow_instead_of_wrapping() {
    let mut cart = Cart::new(Uuid::new_v4());
    cart.add(item(Uuid::new_v4(), None, ProductType::Sponsor, i64::MAX / 2 + 1), 2);

    assert_eq!(cart.lines()[0].line_total(), Err(AmountOverflow));
    assert_eq!(cart.total(), Err(AmountOverflow));

    let mut cart = Cart::new(Uuid::new_v4());
    cart.add(item(Uuid::new_v4(), None, ProductType::Sponsor, i64::MAX), 1);
    cart.add(item(Uuid::new_v4(), None, ProductType::Ticket, 1), 1);
    assert_eq!(cart.total(), Err(AmountOverflow));
}

#[test]
fn negative_unit_price_fails_validation() {
    let line = CartLine {
        item: item(Uuid::new_v4(), None, ProductType::Ticket, -500),
        quantity: 1,
    };
    let errors = line.validate().unwrap_err();
    assert!(errors.to_string().contains("unit_price"));

    let free = CartLine {
        item: item(Uuid::new_v4(), None, ProductType::Ticket, 0),
        quantity: 1,
    };
    assert!(free.validate().is_ok());
}

#[test]
fn inventory_ids_are_distinct_and_sorted() {
    let hotel = Uuid::new_v4();
    let room = Uuid::new_v4();
    let ticket = Uuid::new_v4();
    let mut cart = Cart::new(Uuid::new_v4());
    cart.add(item(hotel, Some(room), ProductType::Hotel, 12_000), 1);
    cart.add(item(ticket, None, ProductType::Ticket, 5_000), 1);
    cart.add(item(Uuid::new_v4(), Some(room), ProductType::Hotel, 12_000), 1);

    let mut expected = vec![room, ticket];
    expected.sort();
    assert_eq!(cart.inventory_ids(), expected);
}
